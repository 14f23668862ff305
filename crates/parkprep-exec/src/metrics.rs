//! Progress reporting.
//!
//! Stage counts go to the manifest and to `tracing`; wiring the events to a
//! console or file is the binary's job.

use std::time::{SystemTime, UNIX_EPOCH};

use parkprep_core::manifest::RunManifest;

pub fn record_stage(
    manifest: &mut RunManifest,
    source: &str,
    stage: &str,
    rows_in: usize,
    rows_out: usize,
) {
    manifest.record(source, stage, rows_in, rows_out);
    tracing::info!(source, stage, rows_in, rows_out, "stage finished");
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
