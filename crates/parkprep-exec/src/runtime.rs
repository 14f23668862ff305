//! Runtime: the preprocess driver.
//!
//! Per source: read CSV -> validate -> parse -> expire, optionally saving the
//! cleaned rows next to the raw file. Then the join, then the final write.
//!
//! Failure policy:
//! - Unreadable input, unparseable cells, and join misconfiguration abort the
//!   run with an `ExecError`.
//! - Writes (intermediate and final) never abort. They log the error and
//!   report `false`; callers must check `RunOutcome::written`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use thiserror::Error;

use parkprep_catalog::{Catalog, CatalogError, SourceSpec};
use parkprep_core::prelude::{Digest, PreprocessConfig, Row, RowSet, RunManifest};
use parkprep_io::{write_csv_file, CsvReader};
use parkprep_operators::traits::{OpError, Operator};
use parkprep_operators::{ExpirationFilter, NestedLoopJoin, Parse, Validate};

use crate::metrics::{now_millis, record_stage};

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: parkprep_io::Error,
    },

    #[error("source '{source_name}', stage '{stage}': {source}")]
    Stage {
        source_name: String,
        stage: &'static str,
        #[source]
        source: OpError,
    },

    #[error("join: {0}")]
    Join(#[source] OpError),

    #[error("hashing error: {0}")]
    Hash(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest encoding: {0}")]
    Manifest(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub manifest: RunManifest,
    pub output_path: PathBuf,
    pub rows_written: usize,
    /// False when the final write failed (see the log for the cause).
    pub written: bool,
}

/// Preprocess driver. Owns its config and catalog; `run` may be called more
/// than once and shares no state between calls.
pub struct Preprocessor {
    cfg: PreprocessConfig,
    catalog: Catalog,
}

impl Preprocessor {
    pub fn new(cfg: PreprocessConfig, catalog: Catalog) -> Result<Self, ExecError> {
        catalog.check()?;
        Ok(Self { cfg, catalog })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.cfg
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn run(&self) -> Result<RunOutcome, ExecError> {
        let config_digest = Digest::of_serde(&(&self.cfg, &self.catalog))
            .map_err(|e| ExecError::Hash(e.to_string()))?;
        let mut manifest = RunManifest::new(config_digest, now_millis());

        // One cutoff for both sources.
        let cutoff = self.cfg.as_of.unwrap_or_else(|| Local::now().date_naive());
        tracing::info!(%cutoff, "processing");

        let (first, first_cols) =
            self.process_source(&self.catalog.first, &self.cfg.first_source, cutoff, &mut manifest)?;
        let (second, second_cols) = self.process_source(
            &self.catalog.second,
            &self.cfg.second_source,
            cutoff,
            &mut manifest,
        )?;

        tracing::info!("joining tables");
        let join = NestedLoopJoin {
            primary_keys: self.catalog.primary_keys.clone(),
        };
        let header = join
            .plan(&[first_cols, second_cols])
            .map_err(ExecError::Join)?;
        let rows_in = first.len() + second.len();
        let joined = join.eval(vec![first, second]).map_err(ExecError::Join)?;
        record_stage(&mut manifest, "joined", join.name(), rows_in, joined.len());

        let output_path = self.cfg.output_path();
        tracing::info!(path = %output_path.display(), "saving result");
        let written = save_rows(&output_path, &joined, &header);
        let output_digest = if written { digest_file(&output_path) } else { None };

        let manifest = manifest.finish(now_millis(), output_path.clone(), written, output_digest);
        tracing::info!(rows = joined.len(), written, "preprocess finished");
        Ok(RunOutcome {
            manifest,
            output_path,
            rows_written: if written { joined.len() } else { 0 },
            written,
        })
    }

    fn process_source(
        &self,
        source: &SourceSpec,
        path: &Path,
        cutoff: NaiveDate,
        manifest: &mut RunManifest,
    ) -> Result<(RowSet, Vec<String>), ExecError> {
        tracing::info!(source = %source.name, path = %path.display(), "working on source");
        let (rows, header) = read_source(path)?;
        record_stage(manifest, &source.name, "read", rows.len(), rows.len());

        let ops: Vec<Box<dyn Operator>> = vec![
            Box::new(Validate {
                schema: source.schema.clone(),
            }),
            Box::new(Parse {
                schema: source.schema.clone(),
            }),
            Box::new(ExpirationFilter {
                column: self.catalog.expiration_column.clone(),
                as_of: Some(cutoff),
            }),
        ];
        let (rows, cols) = run_chain(&source.name, &ops, rows, header, manifest)?;

        if self.cfg.save_intermediate {
            let side = intermediate_path(path);
            tracing::info!(path = %side.display(), "saving intermediate file");
            save_rows(&side, &rows, &cols);
        }
        Ok((rows, cols))
    }
}

/// Read a whole CSV source; returns its rows and header.
pub(crate) fn read_source(path: &Path) -> Result<(RowSet, Vec<String>), ExecError> {
    let read = |source| ExecError::Read {
        path: path.to_path_buf(),
        source,
    };
    let reader = CsvReader::from_path(path).map_err(read)?;
    let header = reader.headers().to_vec();
    let rows = reader.read_all().map_err(read)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "finished reading csv file");
    Ok((rows, header))
}

/// Plan and evaluate unary operators in order, recording each stage.
pub(crate) fn run_chain(
    source_name: &str,
    ops: &[Box<dyn Operator>],
    mut rows: RowSet,
    mut cols: Vec<String>,
    manifest: &mut RunManifest,
) -> Result<(RowSet, Vec<String>), ExecError> {
    for op in ops {
        let stage_err = |source| ExecError::Stage {
            source_name: source_name.to_string(),
            stage: op.name(),
            source,
        };
        cols = op.plan(&[cols]).map_err(stage_err)?;
        let before = rows.len();
        rows = op.eval(vec![rows]).map_err(stage_err)?;
        record_stage(manifest, source_name, op.name(), before, rows.len());
    }
    Ok((rows, cols))
}

/// `data/parking_list.csv` -> `data/parking_list_processed.csv`.
pub fn intermediate_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}_processed.csv"))
}

/// Write rows, logging instead of propagating failures.
pub(crate) fn save_rows(path: &Path, rows: &[Row], header: &[String]) -> bool {
    match write_csv_file(path, rows, header) {
        Ok(n) => {
            tracing::info!(path = %path.display(), rows = n, "saved csv file");
            true
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to save csv file");
            false
        }
    }
}

pub(crate) fn digest_file(path: &Path) -> Option<Digest> {
    match fs::read(path) {
        Ok(bytes) => Some(Digest::of_bytes(&bytes)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot digest written file");
            None
        }
    }
}

/// Persist a manifest as pretty JSON.
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<(), ExecError> {
    let json = serde_json::to_vec_pretty(manifest)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intermediate_file_sits_next_to_the_source() {
        assert_eq!(
            intermediate_path(Path::new("/data/parking_list2.csv")),
            PathBuf::from("/data/parking_list2_processed.csv")
        );
        assert_eq!(
            intermediate_path(Path::new("../parking_list.csv")),
            PathBuf::from("../parking_list_processed.csv")
        );
    }

    #[test]
    fn misconfigured_catalog_is_rejected_up_front() {
        let mut catalog = Catalog::builtin();
        catalog.primary_keys.clear();
        let err = Preprocessor::new(PreprocessConfig::default(), catalog).err().unwrap();
        assert!(matches!(err, ExecError::Catalog(_)));
    }

    #[test]
    fn missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PreprocessConfig {
            first_source: dir.path().join("nope.csv"),
            second_source: dir.path().join("nope2.csv"),
            destination: dir.path().to_path_buf(),
            output_name: "result.csv".into(),
            ..Default::default()
        };
        let err = Preprocessor::new(cfg, Catalog::builtin()).unwrap().run().unwrap_err();
        assert!(matches!(err, ExecError::Read { .. }));
        assert!(!dir.path().join("result.csv").exists());
    }

    #[test]
    fn failed_write_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("no-such-dir").join("out.csv");
        assert!(!save_rows(&missing_dir, &[], &["a".to_string()]));
    }
}
