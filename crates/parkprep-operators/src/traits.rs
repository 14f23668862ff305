//! Operator trait + common interfaces.
//!
//! Drivers call `plan(...)` to learn an operator's output columns (needed to
//! write a header when a stage ends up empty), then `eval(...)` with owned row
//! sets. Unary operators take exactly one input; the join and concat take two.

use parkprep_core::error::Error as CoreError;
use parkprep_core::types::RowSet;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpError {
    /// Operator was configured in a way that can never run correctly.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("planning error: {0}")]
    Plan(String),

    #[error("column '{column}': {source}")]
    Parse {
        column: String,
        #[source]
        source: CoreError,
    },

    /// Input did not satisfy what the operator expects (e.g. unparsed dates).
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("execution error: {0}")]
    Exec(String),
}

pub trait Operator {
    /// Human-readable operator name (stable; used in logs and manifests).
    fn name(&self) -> &'static str;

    /// Output column names for the given input column lists.
    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError>;

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError>;
}

/// Unwrap the single input of a unary operator.
pub(crate) fn single_input(name: &str, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
    let n = inputs.len();
    let mut it = inputs.into_iter();
    match (it.next(), n) {
        (Some(rows), 1) => Ok(rows),
        _ => Err(OpError::Exec(format!("{name} expects one input, got {n}"))),
    }
}

/// Unwrap both inputs of a binary operator.
pub(crate) fn pair_input(name: &str, inputs: Vec<RowSet>) -> Result<(RowSet, RowSet), OpError> {
    let n = inputs.len();
    let mut it = inputs.into_iter();
    match (it.next(), it.next(), n) {
        (Some(a), Some(b), 2) => Ok((a, b)),
        _ => Err(OpError::Exec(format!("{name} expects two inputs, got {n}"))),
    }
}

pub(crate) fn single_plan<'a>(
    name: &str,
    input_columns: &'a [Vec<String>],
) -> Result<&'a Vec<String>, OpError> {
    match input_columns {
        [cols] => Ok(cols),
        _ => Err(OpError::Plan(format!(
            "{name} expects one input, got {}",
            input_columns.len()
        ))),
    }
}
