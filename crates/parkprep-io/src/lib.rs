#![forbid(unsafe_code)]
//! parkprep-io: delimited-file adapters for `Row` sets.
//!
//! Readers materialize a whole file; the preprocessor only handles extracts
//! that fit in memory. Every handle is opened and released inside one call.

pub mod error;
pub mod readers;
pub mod writers;

pub use error::{Error, Result};
pub use readers::csv::{read_csv_file, CsvReader};
pub use writers::csv::{write_csv_file, CsvWriter};
