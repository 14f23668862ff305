//! Writers that persist `Row`s as delimited text.

pub mod csv;
