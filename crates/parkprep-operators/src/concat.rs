//! Vertical concatenation of two row sets with column alignment.
//!
//! The output header is the first input's columns followed by columns only the
//! second input has. Every output row carries the full header; cells a side
//! does not have are `Null`.

use parkprep_core::types::{Row, RowSet, Value};

use crate::traits::{pair_input, OpError, Operator};

#[derive(Default)]
pub struct Concat;

fn union_columns<'a, I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut cols: Vec<String> = Vec::new();
    for list in lists {
        for c in list {
            if !cols.contains(c) {
                cols.push(c.clone());
            }
        }
    }
    cols
}

impl Operator for Concat {
    fn name(&self) -> &'static str {
        "concat"
    }

    fn plan(&self, input_columns: &[Vec<String>]) -> Result<Vec<String>, OpError> {
        if input_columns.len() != 2 {
            return Err(OpError::Plan(format!(
                "concat expects two inputs, got {}",
                input_columns.len()
            )));
        }
        Ok(union_columns(input_columns.iter().map(Vec::as_slice)))
    }

    fn eval(&self, inputs: Vec<RowSet>) -> Result<RowSet, OpError> {
        let (a, b) = pair_input(self.name(), inputs)?;
        let seen: Vec<Vec<String>> = a
            .iter()
            .chain(b.iter())
            .map(|r| r.column_names().map(str::to_string).collect())
            .collect();
        let header = union_columns(seen.iter().map(Vec::as_slice));

        let out: RowSet = a
            .into_iter()
            .chain(b)
            .map(|mut row| {
                let mut aligned = Row::with_capacity(header.len());
                for c in &header {
                    aligned.insert(c.clone(), row.remove(c).unwrap_or(Value::Null));
                }
                aligned
            })
            .collect();
        tracing::info!(rows = out.len(), columns = header.len(), "concatenated row sets");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns_across_inputs() {
        let a = vec![Row::from_pairs([("id", "b1"), ("operation_hours", "unknown")])];
        let b = vec![Row::from_pairs([("id", "s1"), ("type", "Street")])];
        let out = Concat.eval(vec![a, b]).unwrap();
        assert_eq!(out.len(), 2);
        for row in &out {
            assert_eq!(
                row.column_names().collect::<Vec<_>>(),
                vec!["id", "operation_hours", "type"]
            );
        }
        assert_eq!(out[0].get("type"), Some(&Value::Null));
        assert_eq!(out[1].get("operation_hours"), Some(&Value::Null));
    }

    #[test]
    fn plan_is_the_ordered_union() {
        let cols = Concat
            .plan(&[
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "a".to_string()],
            ])
            .unwrap();
        assert_eq!(cols, vec!["a", "b", "c"]);
    }
}
