//! Readers that turn delimited text into `Row`s of raw strings.

pub mod csv;
