//! CSV reader producing raw-string `Row`s keyed by the header line.
//!
//! Records shorter than the header are accepted; the missing trailing cells
//! read as empty strings, so every row carries every header column. Extra
//! trailing fields are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use parkprep_core::types::{Row, RowSet, Value};

use crate::error::{Error, Result};

pub struct CsvReader<R: Read> {
    rdr: csv::Reader<R>,
    headers: Vec<String>,
    record: StringRecord,
}

impl CsvReader<File> {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        Ok(Self {
            rdr,
            headers,
            record: StringRecord::new(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Next record as a row, or `None` at end of input.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if !self.rdr.read_record(&mut self.record)? {
            return Ok(None);
        }
        let mut row = Row::with_capacity(self.headers.len());
        let mut cells = self.record.iter();
        for name in &self.headers {
            let cell = cells.next().unwrap_or_default();
            row.insert(name.clone(), Value::Str(cell.to_string()));
        }
        Ok(Some(row))
    }

    /// Drain the remaining records.
    pub fn read_all(mut self) -> Result<RowSet> {
        let mut rows = RowSet::new();
        while let Some(row) = self.next_row()? {
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Read a whole CSV file into memory.
pub fn read_csv_file(path: &Path) -> Result<RowSet> {
    let reader = CsvReader::from_path(path)?;
    let columns = reader.headers().len();
    let rows = reader.read_all()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), columns, "read csv file");
    Ok(rows)
}
