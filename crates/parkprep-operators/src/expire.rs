//! Expiration filter: drop licenses that lapsed before the cutoff date.

use chrono::{Local, NaiveDate};
use parkprep_core::types::{RowSet, Value};

use crate::partition::try_partition_in_place;
use crate::traits::{single_input, single_plan, OpError, Operator};

pub use parkprep_core::config::DEFAULT_EXPIRATION_COLUMN;

/// Keep rows whose `column` date is on or after `today`.
///
/// Rows must already be parsed: a cell that is not a `Value::Date` is a
/// precondition violation, not a silent drop. Kept rows may be reordered.
pub fn filter_license_expired_rows(
    mut rows: RowSet,
    column: &str,
    today: NaiveDate,
) -> Result<RowSet, OpError> {
    let before = rows.len();
    try_partition_in_place(&mut rows, |row| match row.get(column) {
        Some(Value::Date(expires)) => Ok(*expires >= today),
        other => Err(OpError::Precondition(format!(
            "column '{column}' must hold a parsed date, found {other:?}"
        ))),
    })?;
    tracing::info!(before, after = rows.len(), %today, "filtered rows whose license has expired");
    Ok(rows)
}

/// Expiration filter stage. The cutoff is read once per `eval`.
pub struct ExpirationFilter {
    pub column: String,
    /// Fixed cutoff; `None` uses the local calendar date at evaluation time.
    pub as_of: Option<NaiveDate>,
}

impl Default for ExpirationFilter {
    fn default() -> Self {
        Self {
            column: DEFAULT_EXPIRATION_COLUMN.to_string(),
            as_of: None,
        }
    }
}

impl ExpirationFilter {
    pub fn cutoff(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Operator for ExpirationFilter {
    fn name(&self) -> &'static str {
        "expire"
    }

    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        let cols = single_plan(self.name(), input_columns)?;
        if !cols.contains(&self.column) {
            return Err(OpError::Plan(format!(
                "expiration column '{}' is not among the input columns",
                self.column
            )));
        }
        Ok(cols.clone())
    }

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let rows = single_input(self.name(), inputs)?;
        filter_license_expired_rows(rows, &self.column, self.cutoff())
    }
}
