//! # metshard
//!
//! Fans the Metropolitan Museum of Art open-access CSV out into one JSON file
//! per object, spread over a sharded directory tree so that no directory holds
//! more than a hundred files.
//!
//! ## Pipeline
//!
//! 1. **Fetch** - reuse the local cache (`data.csv`) if it exists, otherwise
//!    stream the dataset into it ([`io::fetch`]).
//! 2. **Parse** - read the cache as CSV, first row as field names
//!    ([`io::csv`]).
//! 3. **Write** - zero-pad each record's `Object ID`, derive its shard
//!    directory ([`shard`]) and write the record there as pretty, key-sorted
//!    JSON ([`writer`], [`io::json`]).
//!
//! Everything runs on one thread with blocking I/O. Any failure aborts the
//! run; re-running reuses the cache and rewrites identical files.
//!
//! ## Example
//!
//! ```no_run
//! use metshard::{ExportConfig, Exporter};
//! # fn main() -> anyhow::Result<()> {
//! let config = ExportConfig::default()
//!     .with_cache_path("cache/MetObjects.csv.gz")
//!     .with_output_root("out");
//! let stats = Exporter::new(config)?.run()?;
//! println!("{} records", stats.records_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! ```text
//! Object ID 3168449 -> out/00/03/16/84/0003168449.json
//! ```
//!
//! ## Features
//!
//! - `http` (default) - download over HTTP(S) with `reqwest`
//! - `compression-gzip`, `compression-zstd` (default) - compressed cache files

use std::collections::BTreeMap;

pub mod config;
pub mod export;
pub mod io;
pub mod shard;
pub mod stats;
pub mod writer;

/// One CSV row keyed by header name. Ordered so JSON output is key-sorted.
pub type Record = BTreeMap<String, String>;

pub use config::ExportConfig;
pub use export::Exporter;
pub use io::csv::{read_records_vec, RecordReader};
pub use io::fetch::{fetch_or_reuse, FetchOutcome};
pub use io::json::{read_record_json, write_record_json};
pub use io::source::{source_for, DataSource, FileSource};
#[cfg(feature = "http")]
pub use io::source::HttpSource;
pub use shard::{zero_pad, ShardLayout};
pub use stats::ExportStats;
pub use writer::{RecordWriter, WriteTotals};
