//! Nested-loop inner join.
//!
//! Every row of the first input is compared against every row of the second.
//! Matching pairs merge into one row: the first row's columns, then the
//! second row's columns overwriting or extending them. The second input is the
//! source of truth for conflicting columns. Duplicate keys on either side fan
//! out into one output row per matching pair.

use parkprep_core::types::{Row, RowSet};

use crate::join::check_primary_keys;
use crate::traits::{pair_input, OpError, Operator};

/// Join `rows_a` with `rows_b` on `primary_keys`.
///
/// A row lacking a key column, or holding `Null` under it, matches nothing.
pub fn join(rows_a: &[Row], rows_b: &[Row], primary_keys: &[String]) -> Result<RowSet, OpError> {
    check_primary_keys(primary_keys)?;
    tracing::info!(
        left = rows_a.len(),
        right = rows_b.len(),
        keys = ?primary_keys,
        "joining row sets"
    );

    let mut out = RowSet::new();
    for a in rows_a {
        for b in rows_b {
            if !keys_match(a, b, primary_keys) {
                continue;
            }
            let mut joined = Row::with_capacity(a.len() + b.len());
            joined.merge_from(a);
            joined.merge_from(b);
            out.push(joined);
        }
    }

    tracing::info!(rows = out.len(), keys = ?primary_keys, "joined row sets");
    Ok(out)
}

fn keys_match(a: &Row, b: &Row, primary_keys: &[String]) -> bool {
    primary_keys.iter().all(|k| match (a.get(k), b.get(k)) {
        (Some(x), Some(y)) => !x.is_null() && x == y,
        _ => false,
    })
}

pub struct NestedLoopJoin {
    pub primary_keys: Vec<String>,
}

impl Operator for NestedLoopJoin {
    fn name(&self) -> &'static str {
        "join_nested_loop"
    }

    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        check_primary_keys(&self.primary_keys)?;
        let [left, right] = input_columns else {
            return Err(OpError::Plan(format!(
                "nested loop join expects two inputs, got {}",
                input_columns.len()
            )));
        };
        for key in &self.primary_keys {
            if !left.contains(key) || !right.contains(key) {
                return Err(OpError::Config(format!(
                    "primary key '{key}' must be a column of both inputs"
                )));
            }
        }
        let mut cols = left.clone();
        for c in right {
            if !cols.contains(c) {
                cols.push(c.clone());
            }
        }
        Ok(cols)
    }

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let (a, b) = pair_input(self.name(), inputs)?;
        join(&a, &b, &self.primary_keys)
    }
}
