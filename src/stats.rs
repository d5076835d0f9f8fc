//! Run summary for an export.
//!
//! [`ExportStats`] is returned by [`Exporter::run`](crate::Exporter::run). It
//! can be logged through `tracing` or saved as JSON next to the output.

use crate::io::fetch::FetchOutcome;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub fetch: FetchOutcome,
    pub records_written: u64,
    pub bytes_written: u64,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl ExportStats {
    /// Emit the summary as a single `info` event.
    pub fn log_summary(&self) {
        info!(
            downloaded = self.fetch.was_downloaded(),
            records = self.records_written,
            bytes = self.bytes_written,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "export finished"
        );
    }

    /// Save the summary as pretty JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("serialize export stats")?;
        let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        f.write_all(json.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
