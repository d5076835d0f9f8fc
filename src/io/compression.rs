//! Transparent compression for the cached dataset.
//!
//! The cache file may be stored compressed. When the cache path ends in a
//! codec extension the downloader compresses on the fly through a
//! [`CacheWriter`], and the CSV reader decompresses on the way back in.
//!
//! ## Built-in Codecs
//!
//! - **Gzip** (`.gz`) - via `flate2` crate (feature: `compression-gzip`)
//! - **Zstd** (`.zst`) - via `zstd` crate (feature: `compression-zstd`)
//!
//! ## Detection
//!
//! Readers check the path extension first and fall back to magic bytes, so a
//! compressed cache saved under a plain `.csv` name still reads correctly.
//! Writers only look at the extension.
//!
//! With no codec features enabled both helpers are plain buffered pass-throughs.

use anyhow::{Context, Result};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Compression formats the cache can be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    #[cfg(feature = "compression-gzip")]
    Gzip,
    #[cfg(feature = "compression-zstd")]
    Zstd,
}

impl Codec {
    /// Codecs compiled into this build, in detection order.
    pub const ALL: &'static [Codec] = &[
        #[cfg(feature = "compression-gzip")]
        Codec::Gzip,
        #[cfg(feature = "compression-zstd")]
        Codec::Zstd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => "gzip",
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => "zstd",
        }
    }

    /// Lowercase extensions with the leading dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => &[".gz", ".gzip"],
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => &[".zst", ".zstd"],
        }
    }

    /// Signature at the start of a compressed stream.
    pub fn magic_bytes(self) -> &'static [u8] {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => &[0x1f, 0x8b],
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => &[0x28, 0xb5, 0x2f, 0xfd],
        }
    }

    /// Codec whose extension matches `path` (case-insensitive), if any.
    pub fn for_path(path: impl AsRef<Path>) -> Option<Codec> {
        let path_str = path.as_ref().to_string_lossy().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|codec| codec.extensions().iter().any(|ext| path_str.ends_with(ext)))
    }

    /// Peek at the buffered head of `reader` without consuming it.
    fn for_magic<R: BufRead>(reader: &mut R) -> Option<Codec> {
        let buf = reader.fill_buf().ok()?;
        if buf.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|codec| buf.starts_with(codec.magic_bytes()))
    }

    fn decoder<R: Read + 'static>(self, reader: R) -> io::Result<Box<dyn Read>> {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => Ok(Box::new(flate2::read::MultiGzDecoder::new(reader))),
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => Ok(Box::new(zstd::stream::read::Decoder::new(reader)?)),
        }
    }

    fn encoder<W: Write>(self, writer: W) -> io::Result<CacheWriter<W>> {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => Ok(CacheWriter::Gzip(flate2::write::GzEncoder::new(
                writer,
                flate2::Compression::default(),
            ))),
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => Ok(CacheWriter::Zstd(zstd::stream::write::Encoder::new(
                writer, 3,
            )?)),
        }
    }
}

/// Writer for the cache file, compressing when its path asks for it.
///
/// Dropping a `CacheWriter` does not reliably finish a compressed stream;
/// call [`CacheWriter::finish`] and check its result.
pub enum CacheWriter<W: Write> {
    Plain(BufWriter<W>),
    #[cfg(feature = "compression-gzip")]
    Gzip(flate2::write::GzEncoder<W>),
    #[cfg(feature = "compression-zstd")]
    Zstd(zstd::stream::write::Encoder<'static, W>),
}

impl<W: Write> CacheWriter<W> {
    /// Flush buffered data, write any trailer, and hand back the inner writer.
    ///
    /// # Errors
    /// Returns the first I/O error hit while draining or finalizing.
    pub fn finish(self) -> io::Result<W> {
        let mut inner = match self {
            CacheWriter::Plain(w) => w.into_inner().map_err(|e| e.into_error())?,
            #[cfg(feature = "compression-gzip")]
            CacheWriter::Gzip(w) => w.finish()?,
            #[cfg(feature = "compression-zstd")]
            CacheWriter::Zstd(w) => w.finish()?,
        };
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Write for CacheWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CacheWriter::Plain(w) => w.write(buf),
            #[cfg(feature = "compression-gzip")]
            CacheWriter::Gzip(w) => w.write(buf),
            #[cfg(feature = "compression-zstd")]
            CacheWriter::Zstd(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CacheWriter::Plain(w) => w.flush(),
            #[cfg(feature = "compression-gzip")]
            CacheWriter::Gzip(w) => w.flush(),
            #[cfg(feature = "compression-zstd")]
            CacheWriter::Zstd(w) => w.flush(),
        }
    }
}

/// Wrap `reader` with decompression when the path or content says so.
///
/// # Errors
/// Returns an error if the matching codec fails to initialize.
pub fn auto_detect_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read>> {
    if let Some(codec) = Codec::for_path(&path_hint) {
        return codec
            .decoder(reader)
            .with_context(|| format!("wrap reader with {} codec", codec.name()));
    }

    let mut buf_reader = BufReader::new(reader);
    if let Some(codec) = Codec::for_magic(&mut buf_reader) {
        return codec
            .decoder(buf_reader)
            .with_context(|| format!("wrap reader with {} codec", codec.name()));
    }

    Ok(Box::new(buf_reader))
}

/// Wrap `writer` for the cache at `path_hint`, compressing when the
/// extension names a codec.
///
/// # Errors
/// Returns an error if the matching codec fails to initialize.
pub fn auto_detect_writer<W: Write>(
    writer: W,
    path_hint: impl AsRef<Path>,
) -> Result<CacheWriter<W>> {
    match Codec::for_path(&path_hint) {
        Some(codec) => codec
            .encoder(writer)
            .with_context(|| format!("wrap writer with {} codec", codec.name())),
        None => Ok(CacheWriter::Plain(BufWriter::new(writer))),
    }
}
