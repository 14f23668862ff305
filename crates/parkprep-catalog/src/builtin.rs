//! Built-in schemas for the NYC DCA licensed garage and parking lot extracts,
//! and the column mappings that fold business lots and street meters into one
//! parking-spot table.

use parkprep_core::schema::{ColumnSpec, ColumnType, Schema};

pub const LICENSE_NUMBER: &str = "DCA License Number";
pub const EXPIRATION_COLUMN: &str = "License Expiration Date";

pub fn primary_keys() -> Vec<String> {
    vec![LICENSE_NUMBER.to_string()]
}

/// `parking_list.csv`: license roster without coordinates.
pub fn parking_list_schema() -> Schema {
    use ColumnType::String as Text;
    Schema::new(vec![
        ColumnSpec::required("Address ZIP", Text),
        ColumnSpec::optional("License Type", Text),
        ColumnSpec::required("Address City", Text),
        ColumnSpec::optional("Borough Code", Text),
        ColumnSpec::required("Business Name", Text),
        ColumnSpec::required("Address State", Text),
        ColumnSpec::optional("Business Name 2", Text),
        ColumnSpec::required("Address Borough", Text),
        ColumnSpec::required("Address Building", Text),
        ColumnSpec::required(LICENSE_NUMBER, Text),
        ColumnSpec::required("Address Street Name", Text),
        ColumnSpec::optional("Contact Phone Number", Text),
        ColumnSpec::optional("Secondary Address Street Name", Text),
        ColumnSpec::required(EXPIRATION_COLUMN, ColumnType::date()),
    ])
}

/// `parking_list2.csv`: license details including coordinates and census data.
pub fn parking_list_detail_schema() -> Schema {
    use ColumnType::String as Text;
    Schema::new(vec![
        ColumnSpec::optional("BIN", Text),
        ColumnSpec::optional("BBL", Text),
        ColumnSpec::optional("NTA", Text),
        ColumnSpec::optional("Detail", Text),
        ColumnSpec::optional("Industry", Text),
        ColumnSpec::required("Latitude", ColumnType::Float),
        ColumnSpec::optional("Location", Text),
        ColumnSpec::required("Longitude", ColumnType::Float),
        ColumnSpec::optional("Address ZIP", Text),
        ColumnSpec::optional("Address City", Text),
        ColumnSpec::optional("Borough Code", Text),
        ColumnSpec::optional("Census Tract", Text),
        ColumnSpec::required("Business Name", Text),
        ColumnSpec::optional("Address State", Text),
        ColumnSpec::optional("Business Name 2", Text),
        ColumnSpec::optional("Address Borough", Text),
        ColumnSpec::optional("Community Board", Text),
        ColumnSpec::optional("Address Building", Text),
        ColumnSpec::optional("Council District", Text),
        ColumnSpec::required(LICENSE_NUMBER, Text),
        ColumnSpec::optional("Address Street Name", Text),
        ColumnSpec::optional("Contact Phone Number", Text),
        ColumnSpec::optional("Secondary Address Street Name", Text),
        ColumnSpec::optional("License Creation Date", ColumnType::date()),
        ColumnSpec::required(EXPIRATION_COLUMN, ColumnType::date()),
    ])
}

// ---- harmonize ----

/// Canonical parking-spot columns, in output order.
pub const CANONICAL_COLUMNS: [&str; 9] = [
    "parking_spot_id",
    "type",
    "parking_spot_name",
    "longitude",
    "latitude",
    "address_zip",
    "borough",
    "detail",
    "operation_hours",
];

pub const ZIP_COLUMN: &str = "address_zip";

/// Joined business table column -> canonical column.
pub const BUSINESS_COLUMN_MAPPING: [(&str, &str); 8] = [
    (LICENSE_NUMBER, "parking_spot_id"),
    ("License Type", "type"),
    ("Business Name", "parking_spot_name"),
    ("Longitude", "longitude"),
    ("Latitude", "latitude"),
    ("Address ZIP", "address_zip"),
    ("Address Borough", "borough"),
    ("Detail", "detail"),
];

/// Business lots publish no hours.
pub const BUSINESS_OPERATION_HOURS: &str = "unknown";

/// Street meter list column -> canonical column.
pub const STREET_COLUMN_MAPPING: [(&str, &str); 7] = [
    ("Meter Number", "parking_spot_id"),
    ("Longitude", "longitude"),
    ("Latitude", "latitude"),
    ("Zip Codes", "address_zip"),
    ("Borough", "borough"),
    ("Meter_Hours", "operation_hours"),
    ("Facility", "detail"),
];

pub const STREET_SPOT_TYPE: &str = "Street";

pub fn business_source_columns() -> Vec<String> {
    BUSINESS_COLUMN_MAPPING
        .iter()
        .map(|(from, _)| from.to_string())
        .collect()
}

pub fn street_source_columns() -> Vec<String> {
    STREET_COLUMN_MAPPING
        .iter()
        .map(|(from, _)| from.to_string())
        .collect()
}
