//! The end-to-end pipeline: fetch-or-reuse, parse, shard, write.

use crate::config::ExportConfig;
use crate::io::csv::RecordReader;
use crate::io::fetch::fetch_or_reuse;
use crate::io::source::{source_for, DataSource};
use crate::stats::ExportStats;
use crate::writer::RecordWriter;
use anyhow::{Context, Result};
use std::fs::create_dir_all;
use std::time::Instant;
use tracing::info;

/// Runs one export described by an [`ExportConfig`].
///
/// ```no_run
/// use metshard::{ExportConfig, Exporter};
/// # fn main() -> anyhow::Result<()> {
/// let stats = Exporter::new(ExportConfig::default())?.run()?;
/// stats.log_summary();
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Exporter {
    config: ExportConfig,
    writer: RecordWriter,
}

impl Exporter {
    /// # Errors
    /// Returns an error if the config does not validate.
    pub fn new(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        let writer = RecordWriter::new(config.layout()?, config.id_field.clone());
        Ok(Self { config, writer })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Run against the source named by `config.data_url`.
    ///
    /// # Errors
    /// Any network, filesystem or parse failure aborts the run.
    pub fn run(&self) -> Result<ExportStats> {
        let source = source_for(&self.config.data_url)?;
        self.run_with_source(source.as_ref())
    }

    /// Run against an explicit [`DataSource`].
    ///
    /// The source is only opened when the cache file is missing.
    ///
    /// # Errors
    /// Any network, filesystem or parse failure aborts the run.
    pub fn run_with_source(&self, source: &dyn DataSource) -> Result<ExportStats> {
        let started = Instant::now();
        let root = self.writer.layout().root();
        create_dir_all(root).with_context(|| format!("mkdir -p {}", root.display()))?;

        info!("getting open access data");
        let fetch = fetch_or_reuse(source, &self.config.cache_path, self.config.chunk_size)?;

        let records = RecordReader::open(&self.config.cache_path)?;
        info!(
            fields = records.headers().len(),
            root = %root.display(),
            "saving open access data"
        );
        let totals = self
            .writer
            .write_all(records)
            .with_context(|| format!("export {}", self.config.cache_path.display()))?;

        Ok(ExportStats {
            fetch,
            records_written: totals.records,
            bytes_written: totals.bytes,
            elapsed: started.elapsed(),
        })
    }
}
