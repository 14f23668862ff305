//! Stable row filters used by the harmonize stage.

use parkprep_core::types::RowSet;

use crate::traits::{single_input, single_plan, OpError, Operator};

/// Drop rows whose `column` is absent, `Null`, or empty. Keeps input order.
pub struct NonBlank {
    pub column: String,
}

impl NonBlank {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Operator for NonBlank {
    fn name(&self) -> &'static str {
        "non_blank"
    }

    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        Ok(single_plan(self.name(), input_columns)?.clone())
    }

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let mut rows = single_input(self.name(), inputs)?;
        let before = rows.len();
        rows.retain(|row| !row.is_blank(&self.column));
        tracing::info!(column = %self.column, before, after = rows.len(), "dropped rows with blank column");
        Ok(rows)
    }
}
