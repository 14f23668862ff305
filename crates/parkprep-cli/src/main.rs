//! parkprep CLI: clean, join, and harmonize the municipal parking extracts.

use clap::{Args, Parser, Subcommand};
use parkprep_catalog::{apply_pipeline_config, parse_yaml_pipeline, Catalog, PipelineDoc};
use parkprep_core::config::{parse_flag, parse_iso_date, HarmonizeConfig, PreprocessConfig};
use parkprep_exec::{write_manifest, Harmonizer, Preprocessor};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "parkprep")]
#[command(about = "Parking data preprocessing: clean, join, and harmonize licensed-lot extracts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean both licensed-lot extracts and write their inner join
    Preprocess(PreprocessArgs),

    /// Fold the joined table and the street meter list into canonical spots
    Harmonize(HarmonizeArgs),

    /// Validate a pipeline YAML file
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Print the effective schemas and primary keys as a pipeline document
    Schema {
        /// Pipeline YAML file overriding the built-in catalog
        #[arg(short, long)]
        pipeline: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct PreprocessArgs {
    /// Folder to save the result in [default: current directory]
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Name of the result file [default: ../result.csv]
    #[arg(short, long)]
    name: Option<String>,

    /// Also save each cleaned extract next to its source [default: true]
    #[arg(short, long, value_parser = parse_bool_arg)]
    save: Option<bool>,

    /// First raw extract [default: ../parking_list.csv]
    #[arg(long)]
    first: Option<PathBuf>,

    /// Second raw extract [default: ../parking_list2.csv]
    #[arg(long)]
    second: Option<PathBuf>,

    /// Pipeline YAML file (schemas, keys, run settings)
    #[arg(short, long)]
    pipeline: Option<PathBuf>,

    /// Expiration cutoff as YYYY-MM-DD [default: today]
    #[arg(long, value_parser = parse_date_arg)]
    as_of: Option<chrono::NaiveDate>,

    /// Write the run manifest as JSON to this path
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Args, Default)]
struct HarmonizeArgs {
    /// Joined business parking table [default: ../result.csv]
    #[arg(long)]
    business: Option<PathBuf>,

    /// Street meter list [default: ../street_parking_list.csv]
    #[arg(long)]
    street: Option<PathBuf>,

    /// Harmonized output [default: ../concat_result.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the run manifest as JSON to this path
    #[arg(long)]
    manifest: Option<PathBuf>,
}

/// Exit status when the run completed but the result file could not be saved.
const EXIT_NOT_SAVED: u8 = 2;

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess(args) => match preprocess(args) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(EXIT_NOT_SAVED),
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Harmonize(args) => match harmonize(args) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(EXIT_NOT_SAVED),
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Validate { pipeline } => {
            if let Err(e) = validate_pipeline(&pipeline) {
                eprintln!("Validation failed: {}", e);
                return ExitCode::FAILURE;
            }
            println!("✓ Pipeline is valid");
            ExitCode::SUCCESS
        }
        Commands::Schema { pipeline } => {
            if let Err(e) = print_schema(pipeline.as_deref()) {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("parkprep=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Returns whether the result file was saved.
fn preprocess(args: PreprocessArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = PreprocessConfig::from_env();
    let catalog = match &args.pipeline {
        Some(path) => {
            let parsed = parse_yaml_pipeline(&fs::read_to_string(path)?)?;
            apply_pipeline_config(&mut config, &parsed.config);
            parsed.catalog
        }
        None => Catalog::builtin(),
    };
    apply_preprocess_args(&mut config, &args);
    tracing::debug!(?config, "effective configuration");

    let outcome = Preprocessor::new(config, catalog)?.run()?;
    if let Some(path) = &args.manifest {
        write_manifest(path, &outcome.manifest)?;
    }

    if outcome.written {
        println!("✓ Preprocess finished");
        println!("  Rows: {}", outcome.rows_written);
        println!("  Output: {}", outcome.output_path.display());
        println!(
            "  Duration: {}ms",
            outcome.manifest.finished_ms - outcome.manifest.started_ms
        );
    } else {
        eprintln!(
            "Result could not be saved to {}",
            outcome.output_path.display()
        );
    }
    Ok(outcome.written)
}

fn harmonize(args: HarmonizeArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = HarmonizeConfig::from_env();
    apply_harmonize_args(&mut config, &args);
    tracing::debug!(?config, "effective configuration");

    let outcome = Harmonizer::new(config).run()?;
    if let Some(path) = &args.manifest {
        write_manifest(path, &outcome.manifest)?;
    }

    if outcome.written {
        println!("✓ Harmonize finished");
        println!("  Rows: {}", outcome.rows_written);
        println!("  Output: {}", outcome.output_path.display());
    } else {
        eprintln!(
            "Result could not be saved to {}",
            outcome.output_path.display()
        );
    }
    Ok(outcome.written)
}

fn validate_pipeline(pipeline_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let _ = parse_yaml_pipeline(&yaml_content)?;
    Ok(())
}

fn print_schema(pipeline_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match pipeline_path {
        Some(path) => parse_yaml_pipeline(&fs::read_to_string(path)?)?.catalog,
        None => Catalog::builtin(),
    };
    print!("{}", PipelineDoc::from_catalog(&catalog).to_yaml()?);
    Ok(())
}

/// Command-line flags are the last layer; unset flags leave `cfg` alone.
fn apply_preprocess_args(cfg: &mut PreprocessConfig, args: &PreprocessArgs) {
    if let Some(dir) = &args.destination {
        cfg.destination = dir.clone();
    }
    if let Some(name) = &args.name {
        cfg.output_name = name.clone();
    }
    if let Some(save) = args.save {
        cfg.save_intermediate = save;
    }
    if let Some(first) = &args.first {
        cfg.first_source = first.clone();
    }
    if let Some(second) = &args.second {
        cfg.second_source = second.clone();
    }
    if let Some(day) = args.as_of {
        cfg.as_of = Some(day);
    }
}

fn apply_harmonize_args(cfg: &mut HarmonizeConfig, args: &HarmonizeArgs) {
    if let Some(p) = &args.business {
        cfg.business_source = p.clone();
    }
    if let Some(p) = &args.street {
        cfg.street_source = p.clone();
    }
    if let Some(p) = &args.output {
        cfg.output = p.clone();
    }
}

fn parse_bool_arg(s: &str) -> Result<bool, String> {
    parse_flag(s).ok_or_else(|| format!("expected true or false, got '{s}'"))
}

fn parse_date_arg(s: &str) -> Result<chrono::NaiveDate, String> {
    parse_iso_date(s).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use parkprep_catalog::PipelineConfig;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn save_takes_an_explicit_boolean() {
        let cli = Cli::try_parse_from(["parkprep", "preprocess", "-s", "false"]).unwrap();
        let Commands::Preprocess(args) = cli.command else {
            panic!("expected preprocess");
        };
        assert_eq!(args.save, Some(false));

        assert!(Cli::try_parse_from(["parkprep", "preprocess", "--save", "perhaps"]).is_err());
    }

    #[test]
    fn pipeline_config_overrides_env_defaults() {
        let mut config = PreprocessConfig::default();
        let pipeline = PipelineConfig {
            destination: Some("/srv/parking".into()),
            output_name: Some("joined.csv".into()),
            save_intermediate: Some(false),
            ..Default::default()
        };
        apply_pipeline_config(&mut config, &pipeline);
        assert_eq!(config.output_path(), PathBuf::from("/srv/parking/joined.csv"));
        assert!(!config.save_intermediate);
    }

    #[test]
    fn cli_overrides_higher_priority_than_config() {
        let mut config = PreprocessConfig::default();
        let pipeline = PipelineConfig {
            output_name: Some("joined.csv".into()),
            save_intermediate: Some(false),
            ..Default::default()
        };
        apply_pipeline_config(&mut config, &pipeline);

        let cli = Cli::try_parse_from([
            "parkprep",
            "preprocess",
            "-n",
            "cli.csv",
            "--save",
            "true",
            "--as-of",
            "2024-03-01",
        ])
        .unwrap();
        let Commands::Preprocess(args) = cli.command else {
            panic!("expected preprocess");
        };
        apply_preprocess_args(&mut config, &args);
        assert_eq!(config.output_name, "cli.csv");
        assert!(config.save_intermediate);
        assert_eq!(
            config.as_of,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn unset_flags_keep_lower_layers() {
        let mut config = HarmonizeConfig::default();
        apply_harmonize_args(
            &mut config,
            &HarmonizeArgs {
                output: Some("/tmp/spots.csv".into()),
                ..Default::default()
            },
        );
        assert_eq!(config.output, PathBuf::from("/tmp/spots.csv"));
        assert_eq!(config.street_source, PathBuf::from("../street_parking_list.csv"));
    }
}
