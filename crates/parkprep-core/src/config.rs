//! Run configuration that the CLI layers together.
//!
//! Precedence, lowest first: `Default` -> environment (`from_env`) -> pipeline
//! document -> command-line flags. The later layers live in `parkprep-catalog`
//! and `parkprep-cli`; this module only knows the first two.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column holding the license expiration date in both licensed-lot extracts.
pub const DEFAULT_EXPIRATION_COLUMN: &str = "License Expiration Date";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// First raw extract (garage and lot licenses).
    pub first_source: PathBuf,

    /// Second raw extract (license details with coordinates). Authoritative on
    /// conflicting columns after the join.
    pub second_source: PathBuf,

    /// Folder the joined result is written under.
    pub destination: PathBuf,

    /// File name (or relative path) of the joined result inside `destination`.
    pub output_name: String,

    /// Also write `<source>_processed.csv` next to each raw extract.
    pub save_intermediate: bool,

    /// Fixed cutoff for the expiration filter; `None` means "today".
    pub as_of: Option<NaiveDate>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        let cwd = current_dir();
        Self {
            first_source: cwd.join("../parking_list.csv"),
            second_source: cwd.join("../parking_list2.csv"),
            destination: cwd,
            output_name: "../result.csv".to_string(),
            save_intermediate: true,
            as_of: None,
        }
    }
}

impl PreprocessConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `PARKPREP_FIRST_SOURCE`, `PARKPREP_SECOND_SOURCE`: raw extract paths
    /// - `PARKPREP_DESTINATION`: output folder
    /// - `PARKPREP_OUTPUT_NAME`: output file name
    /// - `PARKPREP_SAVE_INTERMEDIATE`: `true`/`false`
    /// - `PARKPREP_AS_OF`: expiration cutoff as `YYYY-MM-DD`
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("PARKPREP_FIRST_SOURCE") {
            cfg.first_source = PathBuf::from(s);
        }

        if let Ok(s) = std::env::var("PARKPREP_SECOND_SOURCE") {
            cfg.second_source = PathBuf::from(s);
        }

        if let Ok(s) = std::env::var("PARKPREP_DESTINATION") {
            cfg.destination = PathBuf::from(s);
        }

        if let Ok(s) = std::env::var("PARKPREP_OUTPUT_NAME") {
            cfg.output_name = s;
        }

        if let Ok(s) = std::env::var("PARKPREP_SAVE_INTERMEDIATE") {
            if let Some(v) = parse_flag(&s) {
                cfg.save_intermediate = v;
            }
        }

        if let Ok(s) = std::env::var("PARKPREP_AS_OF") {
            if let Ok(d) = parse_iso_date(&s) {
                cfg.as_of = Some(d);
            }
        }

        cfg
    }

    /// Absolute, lexically normalized path of the joined output.
    pub fn output_path(&self) -> PathBuf {
        absolutize(&self.destination.join(&self.output_name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonizeConfig {
    /// Joined business parking table produced by the preprocess run.
    pub business_source: PathBuf,

    /// Street meter list.
    pub street_source: PathBuf,

    pub output: PathBuf,
}

impl Default for HarmonizeConfig {
    fn default() -> Self {
        Self {
            business_source: PathBuf::from("../result.csv"),
            street_source: PathBuf::from("../street_parking_list.csv"),
            output: PathBuf::from("../concat_result.csv"),
        }
    }
}

impl HarmonizeConfig {
    /// Environment variables: `PARKPREP_BUSINESS_SOURCE`,
    /// `PARKPREP_STREET_SOURCE`, `PARKPREP_HARMONIZED_OUTPUT`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("PARKPREP_BUSINESS_SOURCE") {
            cfg.business_source = PathBuf::from(s);
        }

        if let Ok(s) = std::env::var("PARKPREP_STREET_SOURCE") {
            cfg.street_source = PathBuf::from(s);
        }

        if let Ok(s) = std::env::var("PARKPREP_HARMONIZED_OUTPUT") {
            cfg.output = PathBuf::from(s);
        }

        cfg
    }
}

/// Accepts `true/false`, `yes/no`, `1/0` (case-insensitive).
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Join relative paths onto the working directory and fold `.`/`..` away
/// without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir().join(path)
    };

    let mut out = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
