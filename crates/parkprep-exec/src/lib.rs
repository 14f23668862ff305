#![forbid(unsafe_code)]
//! parkprep-exec: drivers that own file I/O and run operator chains.
//!
//! `Preprocessor` reads the two licensed-lot extracts, cleans each one
//! (validate -> parse -> expire), joins them, and writes the result.
//! `Harmonizer` folds the joined business table and the street meter list
//! into the canonical parking-spot table. Both run synchronously to
//! completion and emit a `RunManifest`.

pub mod harmonize;
pub mod metrics;
pub mod runtime;

pub use harmonize::{HarmonizeOutcome, Harmonizer};
pub use runtime::{write_manifest, ExecError, Preprocessor, RunOutcome};
