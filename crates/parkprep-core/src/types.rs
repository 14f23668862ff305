//! Row-oriented values shared by every stage.
//!
//! A `Row` is one record of a source or joined table: an ordered mapping from
//! column name to `Value`. Cells arrive as `Value::Str` from the reader and are
//! replaced in place by typed values once the parser has run.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;

/// A set of rows flowing between stages. Order carries no meaning.
pub type RowSet = Vec<Row>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Str(String),
    F64(f64),
    I64(i64),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `Null` and the empty string both count as "no value".
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Whether this value is what a column of `kind` holds after parsing.
    /// `Null` conforms to every type (optional columns may be blank).
    pub fn conforms_to(&self, kind: &ColumnType) -> bool {
        matches!(
            (self, kind),
            (Value::Null, _)
                | (Value::Str(_), ColumnType::String)
                | (Value::F64(_), ColumnType::Float)
                | (Value::I64(_), ColumnType::Integer)
                | (Value::Date(_), ColumnType::Date { .. })
        )
    }
}

/// Cell text as written to CSV output.
///
/// Floats use the shortest representation that reads back to the same value;
/// integral floats keep a trailing `.0` so they are not mistaken for integers.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Str(s) => f.write_str(s),
            Value::F64(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Value::F64(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// Ordered column-name-to-value mapping.
///
/// Insertion order is kept; overwriting an existing column keeps its original
/// position. Lookups are linear, which is fine for the few dozen columns a
/// municipal extract carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut row = Row::new();
        for (k, v) in pairs {
            row.insert(k, v.into());
        }
        row
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// True when the column is absent, `Null`, or the empty string.
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).map_or(true, Value::is_empty)
    }

    /// Insert or overwrite a column; returns the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.fields.iter().position(|(k, _)| k == name)?;
        Some(self.fields.remove(idx).1)
    }

    /// Rename a column in place. Any other column already called `to` is
    /// dropped so names stay unique. Returns false if `from` is absent.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.contains(from);
        }
        let Some(idx) = self.fields.iter().position(|(k, _)| k == from) else {
            return false;
        };
        self.fields[idx].0 = to.to_string();
        if let Some(clash) = self
            .fields
            .iter()
            .enumerate()
            .position(|(i, (k, _))| i != idx && k == to)
        {
            self.fields.remove(clash);
        }
        true
    }

    /// Copy every column of `other` into `self`; `other` wins on collisions.
    pub fn merge_from(&mut self, other: &Row) {
        for (k, v) in &other.fields {
            self.insert(k.clone(), v.clone());
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_in_place() {
        let mut row = Row::from_pairs([("a", "1"), ("b", "2")]);
        assert_eq!(row.insert("a", Value::from("9")), Some(Value::from("1")));
        row.insert("c", Value::Null);
        assert_eq!(row.column_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(row.get("a"), Some(&Value::from("9")));
    }

    #[test]
    fn merge_prefers_other_and_appends_new_columns() {
        let mut a = Row::from_pairs([("DCA License Number", "123"), ("Detail", "old")]);
        let b = Row::from_pairs([("Detail", "new"), ("Latitude", "40.7")]);
        a.merge_from(&b);
        assert_eq!(
            a.column_names().collect::<Vec<_>>(),
            vec!["DCA License Number", "Detail", "Latitude"]
        );
        assert_eq!(a.get("Detail"), Some(&Value::from("new")));
    }

    #[test]
    fn blank_covers_missing_null_and_empty() {
        let row = Row::from_pairs([("x", Value::Null), ("y", Value::from("")), ("z", Value::from(" "))]);
        assert!(row.is_blank("x"));
        assert!(row.is_blank("y"));
        assert!(row.is_blank("missing"));
        assert!(!row.is_blank("z"));
    }

    #[test]
    fn rename_keeps_position_and_drops_clash() {
        let mut row = Row::from_pairs([("Meter Number", "M1"), ("type", "x"), ("Borough", "Queens")]);
        assert!(row.rename("Meter Number", "type"));
        assert_eq!(row.column_names().collect::<Vec<_>>(), vec!["type", "Borough"]);
        assert_eq!(row.get("type"), Some(&Value::from("M1")));
        assert!(!row.rename("absent", "whatever"));
    }

    #[test]
    fn display_formats_cells_for_csv() {
        assert_eq!(Value::F64(-73.0).to_string(), "-73.0");
        assert_eq!(Value::F64(40.712776).to_string(), "40.712776");
        assert_eq!(Value::I64(10001).to_string(), "10001");
        assert_eq!(Value::Null.to_string(), "");
        let d = NaiveDate::from_ymd_opt(2031, 2, 3).unwrap();
        assert_eq!(Value::Date(d).to_string(), "2031-02-03");
    }

    #[test]
    fn conformance_by_kind() {
        assert!(Value::F64(1.0).conforms_to(&ColumnType::Float));
        assert!(!Value::Str("1.0".into()).conforms_to(&ColumnType::Float));
        assert!(Value::Null.conforms_to(&ColumnType::date()));
    }
}
