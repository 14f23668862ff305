//! YAML pipeline documents.
//!
//! Every section is optional; anything left out keeps the built-in value.
//!
//! ```yaml
//! config:
//!   first_source: "data/parking_list.csv"
//!   second_source: "data/parking_list2.csv"
//!   destination: "data"
//!   output_name: "result.csv"
//!   save_intermediate: false
//!   as_of: "2024-01-31"
//! sources:
//!   - name: parking_list
//!     schema:
//!       - { name: "DCA License Number", type: string, required: true }
//!       - { name: "License Expiration Date", type: date, required: true, format: "%m/%d/%Y" }
//!   - name: parking_list2
//!     schema:
//!       - { name: "DCA License Number", type: string, required: true }
//!       - { name: "Latitude", type: float, required: true }
//!       - { name: "License Expiration Date", type: date, required: true }
//! primary_keys: ["DCA License Number"]
//! expiration_column: "License Expiration Date"
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use parkprep_core::config::PreprocessConfig;
use parkprep_core::schema::{ColumnSpec, ColumnType, Schema, DEFAULT_DATE_FORMAT};
use serde::{Deserialize, Serialize};

use crate::{Catalog, CatalogError, SourceSpec};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PipelineConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceDef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_column: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDef {
    pub name: String,
    pub schema: Vec<ColumnDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Run settings a pipeline document may carry. CLI flags still win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub first_source: Option<PathBuf>,
    pub second_source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub output_name: Option<String>,
    pub save_intermediate: Option<bool>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct ParsedPipeline {
    pub catalog: Catalog,
    pub config: PipelineConfig,
}

fn parse_kind(def: &ColumnDef) -> Result<ColumnType, CatalogError> {
    let kind = match def.kind.to_ascii_lowercase().as_str() {
        "string" | "str" | "text" => ColumnType::String,
        "float" | "f64" => ColumnType::Float,
        "integer" | "int" | "i64" => ColumnType::Integer,
        "date" => ColumnType::date_with_format(
            def.format.clone().unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
        ),
        other => {
            return Err(CatalogError::Invalid(format!(
                "column '{}' has unknown type '{other}'",
                def.name
            )))
        }
    };
    if def.format.is_some() && !matches!(kind, ColumnType::Date { .. }) {
        return Err(CatalogError::Invalid(format!(
            "column '{}': format only applies to date columns",
            def.name
        )));
    }
    Ok(kind)
}

fn to_source(def: &SourceDef) -> Result<SourceSpec, CatalogError> {
    let columns = def
        .schema
        .iter()
        .map(|c| Ok(ColumnSpec::new(c.name.clone(), c.required, parse_kind(c)?)))
        .collect::<Result<Vec<_>, CatalogError>>()?;
    Ok(SourceSpec {
        name: def.name.clone(),
        schema: Schema::new(columns),
    })
}

fn to_column_def(spec: &ColumnSpec) -> ColumnDef {
    let format = match &spec.kind {
        ColumnType::Date { format } => Some(format.clone()),
        _ => None,
    };
    ColumnDef {
        name: spec.name.clone(),
        kind: spec.kind.label().to_string(),
        required: spec.required,
        format,
    }
}

impl PipelineDoc {
    /// Document describing `catalog` in full (no run config).
    pub fn from_catalog(catalog: &Catalog) -> Self {
        PipelineDoc {
            config: None,
            sources: Some(
                catalog
                    .sources()
                    .iter()
                    .map(|s| SourceDef {
                        name: s.name.clone(),
                        schema: s.schema.columns.iter().map(to_column_def).collect(),
                    })
                    .collect(),
            ),
            primary_keys: Some(catalog.primary_keys.clone()),
            expiration_column: Some(catalog.expiration_column.clone()),
        }
    }

    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Parse a pipeline document on top of the built-in catalog and check it.
pub fn parse_yaml_pipeline(yaml_src: &str) -> Result<ParsedPipeline, CatalogError> {
    let doc: PipelineDoc = serde_yaml::from_str(yaml_src)?;
    let mut catalog = Catalog::builtin();

    if let Some(sources) = &doc.sources {
        let [first, second] = sources.as_slice() else {
            return Err(CatalogError::Invalid(format!(
                "exactly two sources are required, got {}",
                sources.len()
            )));
        };
        catalog.first = to_source(first)?;
        catalog.second = to_source(second)?;
    }
    if let Some(keys) = doc.primary_keys {
        catalog.primary_keys = keys;
    }
    if let Some(col) = doc.expiration_column {
        catalog.expiration_column = col;
    }

    catalog.check()?;
    Ok(ParsedPipeline {
        catalog,
        config: doc.config.unwrap_or_default(),
    })
}

/// Layer a document's run settings over `cfg`.
pub fn apply_pipeline_config(cfg: &mut PreprocessConfig, doc: &PipelineConfig) {
    if let Some(p) = &doc.first_source {
        cfg.first_source = p.clone();
    }
    if let Some(p) = &doc.second_source {
        cfg.second_source = p.clone();
    }
    if let Some(p) = &doc.destination {
        cfg.destination = p.clone();
    }
    if let Some(name) = &doc.output_name {
        cfg.output_name = name.clone();
    }
    if let Some(save) = doc.save_intermediate {
        cfg.save_intermediate = save;
    }
    if let Some(d) = doc.as_of {
        cfg.as_of = Some(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_builtin_catalog() {
        let parsed = parse_yaml_pipeline("{}").unwrap();
        assert_eq!(parsed.catalog, Catalog::builtin());
        assert_eq!(parsed.config, PipelineConfig::default());
    }

    #[test]
    fn sources_and_keys_override_builtins() {
        let yaml = r#"
sources:
  - name: lots
    schema:
      - { name: "Permit", type: string, required: true }
      - { name: "Expires", type: date, required: true, format: "%Y-%m-%d" }
  - name: details
    schema:
      - { name: "Permit", type: string, required: true }
      - { name: "Lat", type: float }
      - { name: "Expires", type: date, required: true }
primary_keys: ["Permit"]
expiration_column: "Expires"
"#;
        let parsed = parse_yaml_pipeline(yaml).unwrap();
        let c = &parsed.catalog;
        assert_eq!(c.first.name, "lots");
        assert_eq!(
            c.first.schema.column("Expires").unwrap().kind,
            ColumnType::date_with_format("%Y-%m-%d")
        );
        assert_eq!(c.second.schema.column("Expires").unwrap().kind, ColumnType::date());
        assert!(!c.second.schema.column("Lat").unwrap().required);
        assert_eq!(c.primary_keys, vec!["Permit".to_string()]);
    }

    #[test]
    fn wrong_number_of_sources_is_rejected() {
        let yaml = r#"
sources:
  - name: only
    schema: []
"#;
        let err = parse_yaml_pipeline(yaml).unwrap_err();
        assert!(err.to_string().contains("exactly two sources"));
    }

    #[test]
    fn unknown_type_and_stray_format_are_rejected() {
        let bad_type = r#"
sources:
  - name: a
    schema: [{ name: "x", type: money }]
  - name: b
    schema: [{ name: "x", type: string }]
"#;
        assert!(parse_yaml_pipeline(bad_type).unwrap_err().to_string().contains("unknown type"));

        let stray = r#"
sources:
  - name: a
    schema: [{ name: "x", type: float, format: "%d" }]
  - name: b
    schema: [{ name: "x", type: string }]
"#;
        assert!(parse_yaml_pipeline(stray).unwrap_err().to_string().contains("format"));
    }

    #[test]
    fn empty_primary_keys_fail_before_any_run() {
        assert!(parse_yaml_pipeline("primary_keys: []").is_err());
    }

    #[test]
    fn config_block_layers_over_defaults() {
        let yaml = r#"
config:
  destination: "/srv/data"
  output_name: "joined.csv"
  save_intermediate: false
  as_of: "2024-01-31"
"#;
        let parsed = parse_yaml_pipeline(yaml).unwrap();
        let mut cfg = PreprocessConfig::default();
        apply_pipeline_config(&mut cfg, &parsed.config);
        assert_eq!(cfg.destination, PathBuf::from("/srv/data"));
        assert_eq!(cfg.output_name, "joined.csv");
        assert!(!cfg.save_intermediate);
        assert_eq!(cfg.as_of, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert!(cfg.first_source.ends_with("../parking_list.csv"));
    }

    #[test]
    fn builtin_catalog_survives_a_yaml_round_trip() {
        let yaml = PipelineDoc::from_catalog(&Catalog::builtin()).to_yaml().unwrap();
        let parsed = parse_yaml_pipeline(&yaml).unwrap();
        assert_eq!(parsed.catalog, Catalog::builtin());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_yaml_pipeline("primary_key: [\"x\"]").is_err());
    }
}
