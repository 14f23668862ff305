#![forbid(unsafe_code)]
//! parkprep-core: the shared vocabulary of the parking-data preprocessor.
//!
//! - `types`: `Value` and the ordered `Row` every stage passes around.
//! - `schema`: declarative `ColumnSpec`/`Schema` and the `ColumnType` tags that
//!   resolve to conversion procedures.
//! - `config`: run configuration with env-var overrides.
//! - `manifest`/`hash`: provenance for a finished run.
//!
//! Keep this crate free of file I/O; readers and writers live in `parkprep-io`.

pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod types;

/// Tool version recorded in run manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
