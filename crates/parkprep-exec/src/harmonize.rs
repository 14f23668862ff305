//! Harmonize driver: joined business lots + street meters -> canonical spots.

use std::path::PathBuf;

use parkprep_catalog::builtin::{
    business_source_columns, street_source_columns, BUSINESS_COLUMN_MAPPING,
    BUSINESS_OPERATION_HOURS, CANONICAL_COLUMNS, STREET_COLUMN_MAPPING, STREET_SPOT_TYPE,
    ZIP_COLUMN,
};
use parkprep_core::config::HarmonizeConfig;
use parkprep_core::hash::Digest;
use parkprep_core::manifest::RunManifest;
use parkprep_core::schema::{ColumnSpec, ColumnType, Schema};
use parkprep_operators::concat::Concat;
use parkprep_operators::filter::NonBlank;
use parkprep_operators::map::{AddConstant, Rename};
use parkprep_operators::project::Project;
use parkprep_operators::traits::Operator;
use parkprep_operators::Parse;

use crate::metrics::{now_millis, record_stage};
use crate::runtime::{digest_file, read_source, run_chain, save_rows, ExecError};

#[derive(Debug, Clone)]
pub struct HarmonizeOutcome {
    pub manifest: RunManifest,
    pub output_path: PathBuf,
    pub rows_written: usize,
    pub written: bool,
}

pub struct Harmonizer {
    cfg: HarmonizeConfig,
}

impl Harmonizer {
    pub fn new(cfg: HarmonizeConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &HarmonizeConfig {
        &self.cfg
    }

    pub fn run(&self) -> Result<HarmonizeOutcome, ExecError> {
        let config_digest =
            Digest::of_serde(&self.cfg).map_err(|e| ExecError::Hash(e.to_string()))?;
        let mut manifest = RunManifest::new(config_digest, now_millis());

        tracing::info!(path = %self.cfg.business_source.display(), "reading business parking");
        let (rows, header) = read_source(&self.cfg.business_source)?;
        let (business, business_cols) =
            run_chain("business", &business_ops(), rows, header, &mut manifest)?;

        tracing::info!(path = %self.cfg.street_source.display(), "reading street parking");
        let (rows, header) = read_source(&self.cfg.street_source)?;
        let (street, street_cols) = run_chain("street", &street_ops(), rows, header, &mut manifest)?;

        let concat = Concat;
        let cols = concat
            .plan(&[business_cols, street_cols])
            .map_err(|source| stage_error(concat.name(), source))?;
        let rows_in = business.len() + street.len();
        let rows = concat
            .eval(vec![business, street])
            .map_err(|source| stage_error(concat.name(), source))?;
        record_stage(&mut manifest, "harmonized", concat.name(), rows_in, rows.len());

        let (rows, cols) = run_chain("harmonized", &canonical_ops(), rows, cols, &mut manifest)?;

        let output_path = self.cfg.output.clone();
        let written = save_rows(&output_path, &rows, &cols);
        let output_digest = if written { digest_file(&output_path) } else { None };
        let manifest = manifest.finish(now_millis(), output_path.clone(), written, output_digest);
        tracing::info!(rows = rows.len(), written, "harmonize finished");

        Ok(HarmonizeOutcome {
            manifest,
            output_path,
            rows_written: if written { rows.len() } else { 0 },
            written,
        })
    }
}

fn stage_error(stage: &'static str, source: parkprep_operators::OpError) -> ExecError {
    ExecError::Stage {
        source_name: "harmonized".to_string(),
        stage,
        source,
    }
}

fn business_ops() -> Vec<Box<dyn Operator>> {
    vec![
        Box::new(Project::new(business_source_columns())),
        Box::new(Rename::new(BUSINESS_COLUMN_MAPPING)),
        Box::new(AddConstant::new("operation_hours", BUSINESS_OPERATION_HOURS)),
    ]
}

fn street_ops() -> Vec<Box<dyn Operator>> {
    vec![
        Box::new(Project::new(street_source_columns())),
        Box::new(AddConstant::new("type", STREET_SPOT_TYPE)),
        Box::new(AddConstant::new("parking_spot_name", "")),
        Box::new(Rename::new(STREET_COLUMN_MAPPING)),
    ]
}

/// Canonical order, rows without a zip dropped, zips as integers.
fn canonical_ops() -> Vec<Box<dyn Operator>> {
    vec![
        Box::new(Project::new(CANONICAL_COLUMNS)),
        Box::new(NonBlank::new(ZIP_COLUMN)),
        Box::new(Parse {
            schema: Schema::new(vec![ColumnSpec::required(ZIP_COLUMN, ColumnType::Integer)]),
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const BUSINESS: &str = "\
DCA License Number,License Type,Business Name,Longitude,Latitude,Address ZIP,Address Borough,Detail,BIN
1234567-DCA,Garage,Park Inc,-73.9,40.7,10001.0,Manhattan,Garage,99
7654321-DCA,Lot,Lot LLC,-73.8,40.6,,Queens,Lot,98
";

    const STREET: &str = "\
Meter Number,Longitude,Latitude,Zip Codes,Borough,Meter_Hours,Facility,Status
M-1,-73.7,40.5,11211,Brooklyn,9AM-7PM,Meter,Active
";

    fn fixture(dir: &std::path::Path) -> HarmonizeConfig {
        fs::write(dir.join("result.csv"), BUSINESS).unwrap();
        fs::write(dir.join("street.csv"), STREET).unwrap();
        HarmonizeConfig {
            business_source: dir.join("result.csv"),
            street_source: dir.join("street.csv"),
            output: dir.join("concat_result.csv"),
        }
    }

    #[test]
    fn folds_both_tables_into_canonical_columns() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = Harmonizer::new(fixture(dir.path())).run().unwrap();
        assert!(outcome.written);
        assert_eq!(outcome.rows_written, 2);

        let text = fs::read_to_string(&outcome.output_path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), CANONICAL_COLUMNS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "1234567-DCA,Garage,Park Inc,-73.9,40.7,10001,Manhattan,Garage,unknown"
        );
        assert_eq!(
            lines.next().unwrap(),
            "M-1,Street,,-73.7,40.5,11211,Brooklyn,Meter,9AM-7PM"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn manifest_counts_dropped_zipless_rows() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = Harmonizer::new(fixture(dir.path())).run().unwrap();
        let stage = outcome
            .manifest
            .stages
            .iter()
            .find(|s| s.stage == "non_blank")
            .unwrap();
        assert_eq!((stage.rows_in, stage.rows_out), (3, 2));
    }

    #[test]
    fn non_numeric_zip_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());
        fs::write(
            &cfg.street_source,
            STREET.replace("11211", "NY 11211"),
        )
        .unwrap();
        let err = Harmonizer::new(cfg.clone()).run().unwrap_err();
        assert!(matches!(err, ExecError::Stage { stage: "parse", .. }));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn street_table_missing_a_mapped_column_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture(dir.path());
        fs::write(&cfg.street_source, "Meter Number,Borough\nM-1,Bronx\n").unwrap();
        let err = Harmonizer::new(cfg).run().unwrap_err();
        assert!(matches!(err, ExecError::Stage { stage: "project", .. }));
    }
}
