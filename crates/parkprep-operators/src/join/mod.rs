//! Inner join of two row sets on a primary-key column list.
//!
//! Only the nested-loop strategy exists: the inputs are bounded municipal
//! extracts, so O(|a| * |b|) comparisons are affordable and no index is built.

pub mod nested_loop;

pub use nested_loop::{join, NestedLoopJoin};

use crate::traits::OpError;

/// Reject key lists that cannot express an inner join: an empty list would
/// degrade into a cross product, and repeated names are almost certainly a
/// configuration typo.
pub fn check_primary_keys(primary_keys: &[String]) -> Result<(), OpError> {
    if primary_keys.is_empty() {
        return Err(OpError::Config(
            "primary key set is empty; refusing to compute a cross join".into(),
        ));
    }
    for (i, key) in primary_keys.iter().enumerate() {
        if key.is_empty() {
            return Err(OpError::Config(format!("primary key #{i} is an empty column name")));
        }
        if primary_keys[..i].contains(key) {
            return Err(OpError::Config(format!("primary key '{key}' listed twice")));
        }
    }
    Ok(())
}
