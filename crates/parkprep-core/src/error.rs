use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("cannot parse {value:?} as {expected}: {reason}")]
    Parse {
        value: String,
        expected: String,
        reason: String,
    },

    #[error("Hashing error: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
