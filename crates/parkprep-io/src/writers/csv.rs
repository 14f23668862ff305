//! CSV writer for `Row`s.
//!
//! The header is the declared column list when the caller has one (drivers
//! pass the columns their operator chain planned), otherwise the first row's
//! column order. With no rows at all only the declared header is written, so
//! an empty result is still a well-formed, header-only file.
//!
//! `write_csv_file` writes into a temporary sibling and renames it over the
//! destination once every row is out; a failed write leaves the destination
//! as it was.

use std::io::Write;
use std::path::Path;

use parkprep_core::types::Row;

use crate::error::{Error, Result};

pub struct CsvWriter<W: Write> {
    writer: csv::Writer<W>,
    /// Column order to write; empty means "take the first row's order".
    declared: Vec<String>,
    header: Option<Vec<String>>,
    rows_written: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn to_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            declared: Vec::new(),
            header: None,
            rows_written: 0,
        }
    }

    /// Fix the column order up front.
    pub fn with_header(mut self, header: Vec<String>) -> Self {
        self.declared = header;
        self
    }

    /// Write rows; cells are looked up by header name and missing columns
    /// become empty cells. A column not in the header is an error.
    pub fn write_rows(&mut self, rows: &[Row]) -> Result<()> {
        for row in rows {
            let header = match self.header.take() {
                Some(h) => h,
                None => {
                    let h: Vec<String> = if self.declared.is_empty() {
                        row.column_names().map(str::to_string).collect()
                    } else {
                        std::mem::take(&mut self.declared)
                    };
                    self.writer.write_record(&h)?;
                    h
                }
            };
            let written = self.write_row(row, &header);
            self.header = Some(header);
            written?;
        }
        Ok(())
    }

    fn write_row(&mut self, row: &Row, header: &[String]) -> Result<()> {
        if let Some(extra) = row.column_names().find(|c| !header.iter().any(|h| h == c)) {
            return Err(Error::UnknownColumn {
                row: self.rows_written,
                column: extra.to_string(),
            });
        }

        let record: Vec<String> = header
            .iter()
            .map(|h| row.get(h).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        self.writer.write_record(&record)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Write the declared header if no row was written, flush, and hand back
    /// the row count with the underlying writer.
    pub fn into_inner(mut self) -> Result<(usize, W)> {
        if self.header.is_none() && !self.declared.is_empty() {
            self.writer.write_record(&self.declared)?;
        }
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        Ok((self.rows_written, inner))
    }

    /// Like `into_inner`, for callers that do not need the writer back.
    pub fn finish(self) -> Result<usize> {
        self.into_inner().map(|(n, _)| n)
    }
}

/// Write `rows` to `path`, replacing any existing file only on success.
/// `header` may be empty, in which case the first row decides the columns.
pub fn write_csv_file(path: &Path, rows: &[Row], header: &[String]) -> Result<usize> {
    let open_err = |source| Error::Open {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = tempfile::Builder::new()
        .prefix(".parkprep-")
        .suffix(".csv.tmp")
        .tempfile_in(dir)
        .map_err(open_err)?;

    let mut writer = CsvWriter::to_writer(tmp).with_header(header.to_vec());
    writer.write_rows(rows)?;
    let (n, tmp) = writer.into_inner()?;
    tmp.persist(path).map_err(|e| open_err(e.error))?;

    tracing::debug!(path = %path.display(), rows = n, "wrote csv file");
    Ok(n)
}
