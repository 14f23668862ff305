//! In-place partition used by the filtering stages.
//!
//! Rejected rows are swapped to the tail and the tail is truncated. One pass,
//! no extra allocation, and the order of kept rows is not preserved.

use parkprep_core::types::Row;

use crate::traits::OpError;

pub(crate) fn partition_in_place<F>(rows: &mut Vec<Row>, mut keep: F)
where
    F: FnMut(&Row) -> bool,
{
    let mut slow = 0;
    let mut fast = rows.len();
    while slow < fast {
        if keep(&rows[slow]) {
            slow += 1;
        } else {
            fast -= 1;
            rows.swap(slow, fast);
        }
    }
    rows.truncate(slow);
}

/// Fallible variant; the first error aborts and leaves `rows` partially
/// reordered but complete.
pub(crate) fn try_partition_in_place<F>(rows: &mut Vec<Row>, mut keep: F) -> Result<(), OpError>
where
    F: FnMut(&Row) -> Result<bool, OpError>,
{
    let mut slow = 0;
    let mut fast = rows.len();
    while slow < fast {
        if keep(&rows[slow])? {
            slow += 1;
        } else {
            fast -= 1;
            rows.swap(slow, fast);
        }
    }
    rows.truncate(slow);
    Ok(())
}
