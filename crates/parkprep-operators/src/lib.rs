#![forbid(unsafe_code)]
//! parkprep-operators: in-memory row operators.
//!
//! Design intent:
//! - Pure and synchronous; no file I/O.
//! - Each stage is available as a free function (the contract) and as an
//!   `Operator` value the drivers chain together.
//! - Filters partition in place and truncate, so surviving rows are not kept in
//!   their input order. Nothing downstream assigns meaning to row order.

pub mod traits;

pub mod expire;
pub mod filter;
pub mod map;
pub mod parse;
pub mod project;
pub mod validate;

pub mod concat;
pub mod join;

mod partition;

pub use expire::{filter_license_expired_rows, ExpirationFilter};
pub use join::{join, NestedLoopJoin};
pub use parse::{parse_data, Parse};
pub use traits::{OpError, Operator};
pub use validate::{filter_invalid_rows, Validate};
