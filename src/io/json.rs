//! Pretty JSON encoding of single [`Record`]s.
//!
//! Output is a single object indented by four spaces with `": "` between key
//! and value, keys in sorted order (guaranteed by [`Record`] being a
//! `BTreeMap`), non-ASCII text written as UTF-8 rather than `\u` escapes, and
//! no trailing newline. Encoding is deterministic, so rewriting a record
//! produces a byte-identical file.

use crate::Record;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, Write};
use std::path::Path;

const INDENT: &[u8] = b"    ";

/// Encode `record` into its on-disk JSON form.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_pretty_json(record: &Record) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    record
        .serialize(&mut ser)
        .context("serialize record as JSON")?;
    Ok(out)
}

/// Write `record` to `path`, replacing any existing file.
///
/// Parent directories are created as needed. Returns the number of bytes
/// written.
///
/// # Errors
/// Returns an error if the file/dirs cannot be created or written.
pub fn write_record_json(path: impl AsRef<Path>, record: &Record) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let body = to_pretty_json(record)?;
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    f.write_all(&body)
        .with_context(|| format!("write {}", path.display()))?;
    f.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(body.len())
}

/// Read a record file written by [`write_record_json`].
///
/// # Errors
/// Returns an error if the file cannot be opened or is not a JSON object of
/// string values.
pub fn read_record_json(path: impl AsRef<Path>) -> Result<Record> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse JSON record in {}", path.display()))
}
