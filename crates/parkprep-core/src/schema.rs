//! Declarative column schemas. Pure data; no I/O here.
//!
//! A `Schema` is the ordered list of columns one source file is expected to
//! carry. Each `ColumnSpec` says whether the column must be present and how its
//! raw text converts into a typed `Value`. Conversions are tagged with
//! `ColumnType` rather than stored as closures so schemas stay serializable and
//! can be printed, diffed, and loaded from pipeline documents.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Value;

/// Date pattern used by the municipal license extracts (`01/31/2024`).
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Float,
    Integer,
    Date { format: String },
}

impl ColumnType {
    /// Date column using `DEFAULT_DATE_FORMAT`.
    pub fn date() -> Self {
        ColumnType::Date {
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn date_with_format(format: impl Into<String>) -> Self {
        ColumnType::Date {
            format: format.into(),
        }
    }

    /// Short name used in error messages and pipeline documents.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Float => "float",
            ColumnType::Integer => "integer",
            ColumnType::Date { .. } => "date",
        }
    }

    /// Convert one raw cell into a typed value.
    ///
    /// Strings pass through untouched. Numbers are parsed from trimmed text.
    /// Integers also accept integral float text (`"10001.0"`), truncating
    /// toward zero the way a float-to-int cast does. Dates honour the column's
    /// format and drop any time of day the format captures.
    pub fn convert(&self, raw: &str) -> Result<Value> {
        match self {
            ColumnType::String => Ok(Value::Str(raw.to_string())),
            ColumnType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::F64)
                .map_err(|e| self.parse_error(raw, e.to_string())),
            ColumnType::Integer => {
                let trimmed = raw.trim();
                if let Ok(v) = trimmed.parse::<i64>() {
                    return Ok(Value::I64(v));
                }
                match trimmed.parse::<f64>() {
                    Ok(f) if f.is_finite() && f.abs() < i64::MAX as f64 => {
                        Ok(Value::I64(f.trunc() as i64))
                    }
                    Ok(_) => Err(self.parse_error(raw, "out of range for an integer".into())),
                    Err(e) => Err(self.parse_error(raw, e.to_string())),
                }
            }
            ColumnType::Date { format } => parse_date(raw.trim(), format)
                .map(Value::Date)
                .map_err(|e| self.parse_error(raw, format!("{e} (format {format:?})"))),
        }
    }

    fn parse_error(&self, raw: &str, reason: String) -> Error {
        Error::Parse {
            value: raw.to_string(),
            expected: self.label().to_string(),
            reason,
        }
    }
}

fn parse_date(text: &str, format: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    match NaiveDate::parse_from_str(text, format) {
        Ok(d) => Ok(d),
        Err(date_err) => NaiveDateTime::parse_from_str(text, format)
            .map(|dt| dt.date())
            .map_err(|_| date_err),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub required: bool,
    pub kind: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, required: bool, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            required,
            kind,
        }
    }

    pub fn required(name: impl Into<String>, kind: ColumnType) -> Self {
        Self::new(name, true, kind)
    }

    pub fn optional(name: impl Into<String>, kind: ColumnType) -> Self {
        Self::new(name, false, kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name.as_str())
    }

    /// Reject schemas that declare the same column twice.
    pub fn check(&self) -> Result<()> {
        for (i, col) in self.columns.iter().enumerate() {
            if col.name.is_empty() {
                return Err(Error::Schema(format!("column #{i} has an empty name")));
            }
            if self.columns[..i].iter().any(|c| c.name == col.name) {
                return Err(Error::Schema(format!(
                    "column '{}' declared more than once",
                    col.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_parser_uses_month_day_year_by_default() {
        let v = ColumnType::date().convert("07/04/2031").unwrap();
        assert_eq!(v, Value::Date(NaiveDate::from_ymd_opt(2031, 7, 4).unwrap()));
    }

    #[test]
    fn date_parser_drops_time_of_day() {
        let kind = ColumnType::date_with_format("%m/%d/%Y %H:%M");
        let v = kind.convert("01/15/2030 17:45").unwrap();
        assert_eq!(v, Value::Date(NaiveDate::from_ymd_opt(2030, 1, 15).unwrap()));
    }

    #[test]
    fn malformed_date_is_a_parse_error() {
        let err = ColumnType::date().convert("2030-01-15").unwrap_err();
        assert!(matches!(err, Error::Parse { ref expected, .. } if expected == "date"));
    }

    #[test]
    fn float_parser_trims_and_rejects_text() {
        assert_eq!(
            ColumnType::Float.convert(" -73.95 ").unwrap(),
            Value::F64(-73.95)
        );
        assert!(ColumnType::Float.convert("north").is_err());
    }

    #[test]
    fn integer_parser_accepts_integral_floats() {
        assert_eq!(ColumnType::Integer.convert("10001").unwrap(), Value::I64(10001));
        assert_eq!(ColumnType::Integer.convert("11211.0").unwrap(), Value::I64(11211));
        assert!(ColumnType::Integer.convert("NY").is_err());
    }

    #[test]
    fn integer_parser_rejects_out_of_range_floats() {
        for raw in ["1e20", "-1e20", "inf", "NaN"] {
            let err = ColumnType::Integer.convert(raw).unwrap_err();
            assert!(matches!(err, Error::Parse { ref expected, .. } if expected == "integer"), "{raw}");
        }
        assert_eq!(
            ColumnType::Integer.convert("-11211.9").unwrap(),
            Value::I64(-11211)
        );
    }

    #[test]
    fn string_parser_is_identity() {
        assert_eq!(
            ColumnType::String.convert(" 1234567-DCA ").unwrap(),
            Value::Str(" 1234567-DCA ".into())
        );
    }

    #[test]
    fn schema_lookup_and_duplicate_check() {
        let schema = Schema::new(vec![
            ColumnSpec::required("DCA License Number", ColumnType::String),
            ColumnSpec::optional("Detail", ColumnType::String),
        ]);
        assert!(!schema.column("Detail").unwrap().required);
        assert_eq!(
            schema.required_columns().collect::<Vec<_>>(),
            vec!["DCA License Number"]
        );
        assert!(schema.check().is_ok());

        let dup = Schema::new(vec![
            ColumnSpec::required("BIN", ColumnType::String),
            ColumnSpec::optional("BIN", ColumnType::Float),
        ]);
        assert!(dup.check().is_err());
    }
}
