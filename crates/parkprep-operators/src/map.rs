//! Column-level maps: renaming and constant columns.

use parkprep_core::types::{RowSet, Value};

use crate::traits::{single_input, single_plan, OpError, Operator};

/// Rename columns; `(old, new)` pairs apply in order. Unknown names are
/// skipped, matching how a rename mapping treats absent columns.
#[derive(Default)]
pub struct Rename {
    pub renames: Vec<(String, String)>,
}

impl Rename {
    pub fn new<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            renames: pairs
                .into_iter()
                .map(|(a, b)| (a.into(), b.into()))
                .collect(),
        }
    }
}

impl Operator for Rename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        let mut cols = single_plan(self.name(), input_columns)?.clone();
        for (from, to) in &self.renames {
            let Some(idx) = cols.iter().position(|c| c == from) else {
                continue;
            };
            cols[idx] = to.clone();
            if let Some(clash) = cols
                .iter()
                .enumerate()
                .position(|(i, c)| i != idx && c == to)
            {
                cols.remove(clash);
            }
        }
        Ok(cols)
    }

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let mut rows = single_input(self.name(), inputs)?;
        if self.renames.is_empty() {
            return Ok(rows);
        }
        for row in rows.iter_mut() {
            for (from, to) in &self.renames {
                row.rename(from, to);
            }
        }
        Ok(rows)
    }
}

/// Set a column to the same value on every row, adding it if absent.
pub struct AddConstant {
    pub column: String,
    pub value: Value,
}

impl AddConstant {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

impl Operator for AddConstant {
    fn name(&self) -> &'static str {
        "add_constant"
    }

    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        let mut cols = single_plan(self.name(), input_columns)?.clone();
        if !cols.contains(&self.column) {
            cols.push(self.column.clone());
        }
        Ok(cols)
    }

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let mut rows = single_input(self.name(), inputs)?;
        for row in rows.iter_mut() {
            row.insert(self.column.clone(), self.value.clone());
        }
        Ok(rows)
    }
}
