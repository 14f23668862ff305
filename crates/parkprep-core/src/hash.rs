//! Content digests for run provenance (config snapshot, written output).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Digest(*blake3::hash(bytes).as_bytes())
    }

    /// Digest any serde-serializable value via its JSON encoding.
    pub fn of_serde<T: Serialize>(v: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(v).map_err(|e| Error::Hash(e.to_string()))?;
        Ok(Self::of_bytes(&bytes))
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
