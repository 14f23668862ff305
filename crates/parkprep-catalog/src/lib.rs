#![forbid(unsafe_code)]
//! parkprep-catalog: which columns each source must carry and how they join.
//!
//! - `builtin`: the schemas of the two licensed-lot extracts, the primary key,
//!   and the column mappings of the harmonize stage.
//! - `dsl::yaml`: a pipeline document that can override schemas, keys, and
//!   run configuration without recompiling.
//!
//! A `Catalog` is pure data, built once at startup and never mutated.

pub mod builtin;
pub mod dsl;

use parkprep_core::schema::{ColumnType, Schema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use dsl::yaml::{
    apply_pipeline_config, parse_yaml_pipeline, ParsedPipeline, PipelineConfig, PipelineDoc,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid pipeline: {0}")]
    Invalid(String),

    #[error(transparent)]
    Schema(#[from] parkprep_core::error::Error),
}

/// One declared source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Short label used in logs and manifests.
    pub name: String,
    pub schema: Schema,
}

/// Everything the preprocess run needs to know about its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub first: SourceSpec,
    /// Authoritative on conflicting columns after the join.
    pub second: SourceSpec,
    pub primary_keys: Vec<String>,
    pub expiration_column: String,
}

impl Catalog {
    /// The catalog for the municipal licensed garage and lot extracts.
    pub fn builtin() -> Self {
        Catalog {
            first: SourceSpec {
                name: "parking_list".into(),
                schema: builtin::parking_list_schema(),
            },
            second: SourceSpec {
                name: "parking_list2".into(),
                schema: builtin::parking_list_detail_schema(),
            },
            primary_keys: builtin::primary_keys(),
            expiration_column: builtin::EXPIRATION_COLUMN.to_string(),
        }
    }

    pub fn sources(&self) -> [&SourceSpec; 2] {
        [&self.first, &self.second]
    }

    /// Check the catalog before any row is read: schemas are well formed, the
    /// primary key set is non-empty and required by both sources (so a blank
    /// key never reaches the join), and the expiration column is a date column
    /// of both sources.
    pub fn check(&self) -> Result<(), CatalogError> {
        if self.first.name == self.second.name {
            return Err(CatalogError::Invalid(format!(
                "both sources are named '{}'",
                self.first.name
            )));
        }
        for source in self.sources() {
            source.schema.check()?;
        }

        if self.primary_keys.is_empty() {
            return Err(CatalogError::Invalid("primary_keys must not be empty".into()));
        }
        for (i, key) in self.primary_keys.iter().enumerate() {
            if self.primary_keys[..i].contains(key) {
                return Err(CatalogError::Invalid(format!("primary key '{key}' listed twice")));
            }
            for source in self.sources() {
                match source.schema.column(key) {
                    Some(spec) if spec.required => {}
                    Some(_) => {
                        return Err(CatalogError::Invalid(format!(
                            "primary key '{key}' must be a required column of source '{}'",
                            source.name
                        )))
                    }
                    None => {
                        return Err(CatalogError::Invalid(format!(
                            "primary key '{key}' is not declared by source '{}'",
                            source.name
                        )))
                    }
                }
            }
        }

        for source in self.sources() {
            match source.schema.column(&self.expiration_column) {
                Some(spec) if matches!(spec.kind, ColumnType::Date { .. }) => {}
                Some(_) => {
                    return Err(CatalogError::Invalid(format!(
                        "expiration column '{}' of source '{}' is not a date column",
                        self.expiration_column, source.name
                    )))
                }
                None => {
                    return Err(CatalogError::Invalid(format!(
                        "expiration column '{}' is not declared by source '{}'",
                        self.expiration_column, source.name
                    )))
                }
            }
        }
        Ok(())
    }

    /// Header for an empty join result: first schema, then new columns of the
    /// second schema.
    pub fn joined_columns(&self) -> Vec<String> {
        let mut cols = self.first.schema.column_names();
        for c in self.second.schema.column_names() {
            if !cols.contains(&c) {
                cols.push(c);
            }
        }
        cols
    }
}
