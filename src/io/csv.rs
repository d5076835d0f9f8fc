//! CSV → [`Record`] parsing.
//!
//! The first row names the fields. Every later row becomes a [`Record`] by
//! pairing header and cell by position:
//! - a stray byte-order mark (U+FEFF) is stripped from both ends of each header,
//! - surplus cells beyond the header are dropped,
//! - missing trailing cells leave their keys absent,
//! - a repeated header name keeps the value of its last occurrence.
//!
//! Rows are streamed through [`RecordReader`]; [`read_records_vec`] collects
//! them for small inputs and tests. Parse errors name the 1-based data record
//! (header excluded); the wrapped `csv` error carries the file line.

use crate::io::compression::auto_detect_reader;
use crate::Record;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BOM: char = '\u{feff}';

/// Strip byte-order-mark artifacts from a header name.
#[must_use]
pub fn clean_header(name: &str) -> String {
    name.trim_matches(BOM).to_string()
}

/// Pair `headers` with `row` by position.
#[must_use]
pub fn zip_record(headers: &[String], row: &StringRecord) -> Record {
    headers
        .iter()
        .zip(row.iter())
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect()
}

/// Streaming iterator of [`Record`]s over a CSV source.
pub struct RecordReader<R: Read> {
    rdr: csv::Reader<R>,
    headers: Vec<String>,
    row: StringRecord,
    records: u64,
}

impl RecordReader<Box<dyn Read>> {
    /// Open a CSV file, decompressing it if needed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its header row
    /// cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let rdr = auto_detect_reader(f, path)
            .with_context(|| format!("setup decompression for {}", path.display()))?;
        Self::from_reader(rdr).with_context(|| format!("read CSV header in {}", path.display()))
    }
}

impl<R: Read> RecordReader<R> {
    /// Wrap an already-open CSV stream and consume its header row.
    ///
    /// An empty stream yields a reader with no headers and no records.
    ///
    /// # Errors
    /// Returns an error if the header row is not valid CSV/UTF-8.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut first = StringRecord::new();
        let headers = if rdr.read_record(&mut first).context("parse CSV header")? {
            first.iter().map(clean_header).collect()
        } else {
            Vec::new()
        };
        Ok(Self {
            rdr,
            headers,
            row: StringRecord::new(),
            records: 0,
        })
    }

    /// Field names from the header row, BOM-stripped.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rdr.read_record(&mut self.row) {
            Ok(true) => {
                self.records += 1;
                Some(Ok(zip_record(&self.headers, &self.row)))
            }
            Ok(false) => None,
            Err(e) => {
                self.records += 1;
                Some(Err(anyhow::Error::new(e)
                    .context(format!("parse CSV record #{}", self.records))))
            }
        }
    }
}

/// Read every record of a CSV file into memory.
///
/// # Errors
/// Returns an error if the file cannot be opened or any row fails to parse.
pub fn read_records_vec(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    RecordReader::open(path)?.collect()
}
