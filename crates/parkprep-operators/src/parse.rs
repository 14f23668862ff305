//! Row parser: convert raw string cells into the types a schema declares.

use parkprep_core::schema::Schema;
use parkprep_core::types::{RowSet, Value};

use crate::traits::{single_input, single_plan, OpError, Operator};

/// Replace every declared column's raw text with its typed value, in place.
///
/// - Required columns are converted as-is; validation runs first, so a blank
///   here means the caller skipped it and a non-string type will fail.
/// - Blank or absent optional columns become `Value::Null`.
/// - Cells that already hold the declared type are left alone, which makes a
///   second pass harmless.
///
/// The first cell that does not convert aborts the whole call.
pub fn parse_data(mut rows: RowSet, schema: &Schema) -> Result<RowSet, OpError> {
    for row in rows.iter_mut() {
        for spec in &schema.columns {
            let parsed = match row.get(&spec.name) {
                Some(Value::Str(raw)) if spec.required || !raw.is_empty() => spec
                    .kind
                    .convert(raw)
                    .map_err(|source| OpError::Parse {
                        column: spec.name.clone(),
                        source,
                    })?,
                Some(Value::Str(_)) | Some(Value::Null) | None if !spec.required => Value::Null,
                Some(v) if v.conforms_to(&spec.kind) && !v.is_null() => continue,
                other => {
                    return Err(OpError::Precondition(format!(
                        "column '{}' holds {:?}, expected raw text for a {} column",
                        spec.name,
                        other,
                        spec.kind.label()
                    )))
                }
            };
            row.insert(spec.name.clone(), parsed);
        }
    }
    tracing::info!(rows = rows.len(), columns = schema.len(), "parsed rows into declared types");
    Ok(rows)
}

pub struct Parse {
    pub schema: Schema,
}

impl Operator for Parse {
    fn name(&self) -> &'static str {
        "parse"
    }

    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        let mut cols = single_plan(self.name(), input_columns)?.clone();
        for spec in &self.schema.columns {
            if !cols.contains(&spec.name) {
                cols.push(spec.name.clone());
            }
        }
        Ok(cols)
    }

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let rows = single_input(self.name(), inputs)?;
        parse_data(rows, &self.schema)
    }
}
