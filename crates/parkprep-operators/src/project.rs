//! Projection onto a fixed, ordered column list.

use parkprep_core::types::{Row, RowSet, Value};

use crate::traits::{single_input, single_plan, OpError, Operator};

#[derive(Default)]
pub struct Project {
    pub columns: Vec<String>,
}

impl Project {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "project"
    }

    /// Every projected column must exist in the input header.
    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        let input = single_plan(self.name(), input_columns)?;
        if let Some(missing) = self.columns.iter().find(|c| !input.contains(c)) {
            return Err(OpError::Plan(format!(
                "projected column '{missing}' is not in the input"
            )));
        }
        Ok(self.columns.clone())
    }

    /// Cells missing from a (short) row come out as `Null`.
    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let rows = single_input(self.name(), inputs)?;
        Ok(rows
            .into_iter()
            .map(|mut row| {
                let mut out = Row::with_capacity(self.columns.len());
                for c in &self.columns {
                    out.insert(c.clone(), row.remove(c).unwrap_or(Value::Null));
                }
                out
            })
            .collect())
    }
}
