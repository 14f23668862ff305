//! Run manifest: what a preprocess or harmonize run did, for audit.
//!
//! Drivers record one `StageCount` per stage and source, then finish the
//! manifest with the output digest once the result file is on disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Digest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub source: String,
    pub stage: String,
    pub rows_in: usize,
    pub rows_out: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: Uuid,

    pub tool_version: String,

    /// Digest of the effective configuration and schemas.
    pub config_digest: Digest,

    pub stages: Vec<StageCount>,

    pub output: Option<PathBuf>,

    /// False when the final write failed; the run itself still completed.
    pub output_written: bool,

    pub output_digest: Option<Digest>,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl RunManifest {
    pub fn new(config_digest: Digest, started_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool_version: crate::VERSION.to_string(),
            config_digest,
            stages: Vec::new(),
            output: None,
            output_written: false,
            output_digest: None,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn record(&mut self, source: &str, stage: &str, rows_in: usize, rows_out: usize) {
        self.stages.push(StageCount {
            source: source.to_string(),
            stage: stage.to_string(),
            rows_in,
            rows_out,
        });
    }

    pub fn finish(
        mut self,
        finished_ms: u64,
        output: PathBuf,
        written: bool,
        output_digest: Option<Digest>,
    ) -> Self {
        self.finished_ms = finished_ms;
        self.output = Some(output);
        self.output_written = written;
        self.output_digest = output_digest;
        self
    }
}
