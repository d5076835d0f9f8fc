//! Built-in constants and the [`ExportConfig`] that carries them through the pipeline.
//!
//! The binary runs with [`ExportConfig::default`]; there are no flags or
//! environment overrides. Library callers (and tests) adjust individual
//! settings with the `with_*` builder methods.

use crate::shard::ShardLayout;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Remote location of the open-access dataset.
pub const DATA_URL: &str =
    "https://media.githubusercontent.com/media/metmuseum/openaccess/master/MetObjects.csv";

/// Local cache of the downloaded CSV, relative to the working directory.
pub const LOCAL_DATA_PATH: &str = "data.csv";

/// Root of the sharded JSON tree, relative to the working directory.
pub const DATA_DIR: &str = "_data";

/// Column holding the sharding key.
pub const ID_FIELD: &str = "Object ID";

/// Width identifiers are zero-padded to.
pub const PADDING: usize = 10;

/// Characters per shard directory name.
pub const SEGMENT_WIDTH: usize = 2;

/// Number of nested shard directories.
pub const SEGMENT_COUNT: usize = 4;

/// Size of each read/write during download.
pub const DOWNLOAD_CHUNK_SIZE: usize = 10_240;

/// Settings for one export run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    pub data_url: String,
    pub cache_path: PathBuf,
    pub output_root: PathBuf,
    pub id_field: String,
    pub padding: usize,
    pub segment_width: usize,
    pub segment_count: usize,
    pub chunk_size: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            data_url: DATA_URL.to_string(),
            cache_path: PathBuf::from(LOCAL_DATA_PATH),
            output_root: PathBuf::from(DATA_DIR),
            id_field: ID_FIELD.to_string(),
            padding: PADDING,
            segment_width: SEGMENT_WIDTH,
            segment_count: SEGMENT_COUNT,
            chunk_size: DOWNLOAD_CHUNK_SIZE,
        }
    }
}

impl ExportConfig {
    #[must_use]
    pub fn with_data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = url.into();
        self
    }

    #[must_use]
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    #[must_use]
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    #[must_use]
    pub fn with_id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Override padding width, segment width and segment count together.
    #[must_use]
    pub fn with_layout(mut self, padding: usize, segment_width: usize, segment_count: usize) -> Self {
        self.padding = padding;
        self.segment_width = segment_width;
        self.segment_count = segment_count;
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Build the [`ShardLayout`] described by this config.
    ///
    /// # Errors
    /// Fails when the padding cannot hold every shard segment.
    pub fn layout(&self) -> Result<ShardLayout> {
        ShardLayout::new(
            &self.output_root,
            self.padding,
            self.segment_width,
            self.segment_count,
        )
    }

    /// Check settings before anything touches the network or disk.
    ///
    /// # Errors
    /// Returns an error for a zero chunk size, an empty identifier field
    /// name, or an invalid shard layout.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail!("download chunk size must be non-zero");
        }
        if self.id_field.is_empty() {
            bail!("identifier field name must not be empty");
        }
        self.layout().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = ExportConfig::default();
        assert_eq!(cfg.data_url, DATA_URL);
        assert_eq!(cfg.cache_path, PathBuf::from("data.csv"));
        assert_eq!(cfg.output_root, PathBuf::from("_data"));
        assert_eq!(cfg.id_field, "Object ID");
        assert_eq!((cfg.padding, cfg.segment_width, cfg.segment_count), (10, 2, 4));
        assert_eq!(cfg.chunk_size, 10_240);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let cfg = ExportConfig::default().with_chunk_size(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn short_padding_is_rejected() {
        let cfg = ExportConfig::default().with_layout(6, 2, 4);
        assert!(cfg.validate().is_err());
    }
}
