//! Pipeline documents driving real runs.


use std::fs;

use parkprep::catalog::{apply_pipeline_config, parse_yaml_pipeline, Catalog, PipelineDoc};
use parkprep::core::config::PreprocessConfig;
use parkprep::exec::Preprocessor;
use test_data_gen::{read_back, scratch};

#[test]
fn document_supplies_schemas_keys_and_paths() {
    let (_guard, dir) = scratch();
    fs::write(
        dir.join("lots.csv"),
        "Permit,Owner,Expires\nP-1,Ann,2031-05-01\nP-2,Bob,1999-05-01\nP-3,,2031-05-01\n",
    )
    .unwrap();
    fs::write(
        dir.join("details.csv"),
        "Permit,Lat,Expires\nP-1,40.1,2031-05-01\nP-2,40.2,2031-05-01\nP-3,40.3,2031-05-01\n",
    )
    .unwrap();

    let yaml = format!(
        r#"
config:
  first_source: "{dir}/lots.csv"
  second_source: "{dir}/details.csv"
  destination: "{dir}"
  output_name: "joined.csv"
  save_intermediate: false
  as_of: "2024-01-31"
sources:
  - name: lots
    schema:
      - {{ name: "Permit", type: string, required: true }}
      - {{ name: "Owner", type: string, required: true }}
      - {{ name: "Expires", type: date, required: true, format: "%Y-%m-%d" }}
  - name: details
    schema:
      - {{ name: "Permit", type: string, required: true }}
      - {{ name: "Lat", type: float, required: true }}
      - {{ name: "Expires", type: date, required: true, format: "%Y-%m-%d" }}
primary_keys: ["Permit"]
expiration_column: "Expires"
"#,
        dir = dir.display()
    );

    let parsed = parse_yaml_pipeline(&yaml).unwrap();
    let mut cfg = PreprocessConfig::default();
    apply_pipeline_config(&mut cfg, &parsed.config);

    let outcome = Preprocessor::new(cfg, parsed.catalog).unwrap().run().unwrap();
    assert_eq!(outcome.output_path, dir.join("joined.csv"));
    let (header, rows) = read_back(&outcome.output_path);
    assert_eq!(header, vec!["Permit", "Owner", "Expires", "Lat"]);
    assert_eq!(rows, vec![vec!["P-1", "Ann", "2031-05-01", "40.1"]]);
    assert!(!dir.join("lots_processed.csv").exists());
}

#[test]
fn key_missing_from_one_source_is_rejected_at_load() {
    let yaml = r#"
sources:
  - name: a
    schema:
      - { name: "Permit", type: string, required: true }
      - { name: "Expires", type: date, required: true }
  - name: b
    schema:
      - { name: "Other", type: string, required: true }
      - { name: "Expires", type: date, required: true }
primary_keys: ["Permit"]
expiration_column: "Expires"
"#;
    let err = parse_yaml_pipeline(yaml).unwrap_err();
    assert!(err.to_string().contains("not declared by source 'b'"));
}

#[test]
fn duplicated_primary_keys_are_rejected() {
    let yaml = r#"primary_keys: ["DCA License Number", "DCA License Number"]"#;
    assert!(parse_yaml_pipeline(yaml).is_err());
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(parse_yaml_pipeline("steps: []").is_err());
    assert!(parse_yaml_pipeline("config: { memory_cap: 1 }").is_err());
}

#[test]
fn printed_catalog_parses_back_to_itself() {
    let yaml = PipelineDoc::from_catalog(&Catalog::builtin()).to_yaml().unwrap();
    let parsed = parse_yaml_pipeline(&yaml).unwrap();
    assert_eq!(parsed.catalog, Catalog::builtin());
}
