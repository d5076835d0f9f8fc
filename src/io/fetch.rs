//! Fetch-or-reuse for the local dataset cache.
//!
//! An existing cache file is trusted as is. Otherwise the source is streamed
//! into a temporary file next to the cache in fixed-size chunks. Once the
//! stream ends the file is finished (compression trailer included), synced
//! and renamed into place; any failure before that leaves nothing behind for
//! the next run to mistake for a finished download.

use crate::io::compression::auto_detect_writer;
use crate::io::source::DataSource;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{create_dir_all, metadata};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{info, trace};

/// What [`fetch_or_reuse`] did with the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Cache already present; `bytes` is its size on disk.
    Reused { bytes: u64 },
    /// Cache written from the source; `bytes` is the number of bytes received.
    Downloaded { bytes: u64 },
}

impl FetchOutcome {
    pub fn was_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded { .. })
    }
}

/// Make sure `cache_path` holds the dataset, downloading it from `source`
/// only when the file does not exist yet.
///
/// If `cache_path` carries a codec extension (`.gz`, `.zst`) the download is
/// compressed as it is written.
///
/// # Errors
/// Returns an error if the source cannot be opened or read, or if the cache
/// cannot be written. No retry is attempted.
pub fn fetch_or_reuse(
    source: &dyn DataSource,
    cache_path: impl AsRef<Path>,
    chunk_size: usize,
) -> Result<FetchOutcome> {
    let cache_path = cache_path.as_ref();
    if cache_path.exists() {
        let bytes = metadata(cache_path)
            .with_context(|| format!("stat {}", cache_path.display()))?
            .len();
        info!(path = %cache_path.display(), bytes, "data already downloaded, reusing it");
        return Ok(FetchOutcome::Reused { bytes });
    }

    info!(source = %source.describe(), path = %cache_path.display(), "data file missing, downloading");
    let dir = match cache_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_dir_all(dir).with_context(|| format!("mkdir -p {}", dir.display()))?;

    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))?;
    let file = tmp.as_file().try_clone().context("clone temporary file handle")?;

    let mut reader = source.open()?;
    let mut writer = auto_detect_writer(file, cache_path)
        .with_context(|| format!("setup compression for {}", cache_path.display()))?;
    let bytes = copy_chunked(&mut reader, &mut writer, chunk_size)
        .with_context(|| format!("download {}", source.describe()))?;
    writer
        .finish()
        .and_then(|f| f.sync_all())
        .with_context(|| format!("finish {}", cache_path.display()))?;

    tmp.persist(cache_path)
        .with_context(|| format!("move download into {}", cache_path.display()))?;
    info!(path = %cache_path.display(), bytes, "download complete");
    Ok(FetchOutcome::Downloaded { bytes })
}

/// Copy `reader` into `writer` through a buffer of `chunk_size` bytes.
///
/// Returns the number of bytes copied.
pub(crate) fn copy_chunked<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
) -> Result<u64> {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("read chunk"),
        };
        writer.write_all(&buf[..n]).context("write chunk")?;
        total += n as u64;
        trace!(total, "chunk written");
    }
    Ok(total)
}
