//! Places each [`Record`] at its shard path as a JSON file.

use crate::io::json::write_record_json;
use crate::shard::ShardLayout;
use crate::Record;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use tracing::debug;

/// Totals from [`RecordWriter::write_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteTotals {
    pub records: u64,
    pub bytes: u64,
}

/// Writes records into a [`ShardLayout`], keyed by one identifier column.
#[derive(Clone, Debug)]
pub struct RecordWriter {
    layout: ShardLayout,
    id_field: String,
}

impl RecordWriter {
    pub fn new(layout: ShardLayout, id_field: impl Into<String>) -> Self {
        Self {
            layout,
            id_field: id_field.into(),
        }
    }

    pub fn layout(&self) -> &ShardLayout {
        &self.layout
    }

    /// Identifier of `record`.
    ///
    /// # Errors
    /// Returns an error if the identifier column is absent.
    pub fn identifier<'a>(&self, record: &'a Record) -> Result<&'a str> {
        record
            .get(&self.id_field)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("record has no {:?} field", self.id_field))
    }

    /// Output path for `record` without touching the filesystem.
    ///
    /// # Errors
    /// Returns an error if the identifier is missing or invalid.
    pub fn path_for(&self, record: &Record) -> Result<PathBuf> {
        self.layout.file_path(self.identifier(record)?)
    }

    /// Write one record, overwriting whatever is at its path.
    ///
    /// Returns the path written and its size in bytes.
    ///
    /// # Errors
    /// Returns an error if the identifier is missing or invalid, or on I/O
    /// failure.
    pub fn write(&self, record: &Record) -> Result<(PathBuf, usize)> {
        let id = self.identifier(record)?;
        let dir = self.layout.ensure_dir(id)?;
        let path = dir.join(self.layout.file_name(id));
        let bytes = write_record_json(&path, record)?;
        debug!(id, path = %path.display(), bytes, "record written");
        Ok((path, bytes))
    }

    /// Write every record from `records`, stopping at the first failure.
    ///
    /// # Errors
    /// Returns the first parse or write error, annotated with the 1-based
    /// record number.
    pub fn write_all<I>(&self, records: I) -> Result<WriteTotals>
    where
        I: IntoIterator<Item = Result<Record>>,
    {
        let mut totals = WriteTotals::default();
        for (i, rec) in records.into_iter().enumerate() {
            let rec = rec?;
            let (_, bytes) = self
                .write(&rec)
                .with_context(|| format!("write record #{}", i + 1))?;
            totals.records += 1;
            totals.bytes += bytes as u64;
        }
        Ok(totals)
    }
}
