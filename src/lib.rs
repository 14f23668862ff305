//! parkprep: preprocessing for the municipal parking-space locator.
//!
//! Re-exports the workspace crates so integration tests and benches can use
//! one dependency.

pub use parkprep_catalog as catalog;
pub use parkprep_core as core;
pub use parkprep_exec as exec;
pub use parkprep_io as io;
pub use parkprep_operators as operators;
