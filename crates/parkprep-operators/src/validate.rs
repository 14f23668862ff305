//! Row validator: drop rows missing any required column.

use parkprep_core::schema::Schema;
use parkprep_core::types::RowSet;

use crate::partition::partition_in_place;
use crate::traits::{single_input, single_plan, OpError, Operator};

/// Keep a row iff every required column of `schema` holds a non-empty value.
///
/// Columns absent from the row count as empty. Optional columns are not
/// inspected. Surviving rows may come back in a different order.
pub fn filter_invalid_rows(mut rows: RowSet, schema: &Schema) -> RowSet {
    let before = rows.len();
    let required: Vec<&str> = schema.required_columns().collect();
    partition_in_place(&mut rows, |row| {
        required.iter().all(|name| !row.is_blank(name))
    });
    tracing::info!(before, after = rows.len(), "filtered rows missing required fields");
    rows
}

pub struct Validate {
    pub schema: Schema,
}

impl Operator for Validate {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        Ok(single_plan(self.name(), input_columns)?.clone())
    }

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let rows = single_input(self.name(), inputs)?;
        Ok(filter_invalid_rows(rows, &self.schema))
    }
}
