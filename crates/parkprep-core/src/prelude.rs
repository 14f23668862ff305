//! Convenient re-exports for downstream crates.

pub use crate::config::{HarmonizeConfig, PreprocessConfig};
pub use crate::error::{Error, Result};
pub use crate::hash::Digest;
pub use crate::manifest::{RunManifest, StageCount};
pub use crate::schema::{ColumnSpec, ColumnType, Schema, DEFAULT_DATE_FORMAT};
pub use crate::types::{Row, RowSet, Value};
