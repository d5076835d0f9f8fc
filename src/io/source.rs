//! Where the raw CSV bytes come from.
//!
//! [`DataSource`] is the seam between the downloader and the transport. The
//! production path is [`HttpSource`] (blocking `reqwest`, feature `http`);
//! [`FileSource`] reads a local file and serves offline runs and tests.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A readable origin for the dataset.
pub trait DataSource {
    /// Human-readable location, used in logs and error messages.
    fn describe(&self) -> String;

    /// Open a fresh byte stream over the whole dataset.
    fn open(&self) -> Result<Box<dyn Read>>;
}

/// Dataset stored on the local filesystem.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Box<dyn Read>> {
        let f = File::open(&self.path).with_context(|| format!("open {}", self.path.display()))?;
        Ok(Box::new(f))
    }
}

/// Dataset served over HTTP(S).
///
/// The client has no overall timeout: the full dataset is large and a
/// stalled transfer is left to the operator to interrupt.
#[cfg(feature = "http")]
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[cfg(feature = "http")]
impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn open(&self) -> Result<Box<dyn Read>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("GET {}", self.url))?
            .error_for_status()
            .with_context(|| format!("GET {}", self.url))?;
        Ok(Box::new(resp))
    }
}

/// Pick a [`DataSource`] for `url` by scheme.
///
/// `http://` and `https://` map to [`HttpSource`]; `file://` URLs and bare
/// paths map to [`FileSource`]. Any other scheme is an error.
///
/// # Errors
/// Returns an error for unsupported schemes, or for HTTP URLs when the crate
/// is built without the `http` feature.
pub fn source_for(url: &str) -> Result<Box<dyn DataSource>> {
    if let Some(path) = url.strip_prefix("file://") {
        return Ok(Box::new(FileSource::new(path)));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return http_source(url);
    }
    if let Some((scheme, _)) = url.split_once("://") {
        bail!("unsupported URL scheme {scheme:?} in {url}");
    }
    Ok(Box::new(FileSource::new(url)))
}

#[cfg(feature = "http")]
fn http_source(url: &str) -> Result<Box<dyn DataSource>> {
    Ok(Box::new(HttpSource::new(url)?))
}

#[cfg(not(feature = "http"))]
fn http_source(url: &str) -> Result<Box<dyn DataSource>> {
    bail!("cannot fetch {url}: built without the `http` feature")
}
