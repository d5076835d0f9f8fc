//! Identifier → directory mapping for the sharded JSON tree.
//!
//! An identifier is zero-padded to a fixed width and its leading characters
//! are cut into fixed-width segments, one directory level per segment. With
//! the defaults (width 10, four segments of two) the last two digits are left
//! to the file name, so a leaf directory holds at most 100 records:
//!
//! ```text
//! 3168449 -> 0003168449 -> 00/03/16/84/0003168449.json
//! ```
//!
//! Path computation ([`ShardLayout::relative_dir`], [`ShardLayout::file_path`])
//! is pure; only [`ShardLayout::ensure_dir`] touches the filesystem.

use anyhow::{bail, Context, Result};
use std::fs::create_dir_all;
use std::path::{Component, Path, PathBuf};

/// Left-pad `id` with `0` to `width` characters.
///
/// Mirrors the classic `zfill` rules: a leading `+` or `-` stays in front of
/// the padding, and identifiers already `width` characters or longer are
/// returned unchanged. Width is measured in characters.
#[must_use]
pub fn zero_pad(id: &str, width: usize) -> String {
    let len = id.chars().count();
    if len >= width {
        return id.to_string();
    }
    let fill = "0".repeat(width - len);
    match id.strip_prefix(['+', '-']) {
        Some(rest) => {
            let sign = &id[..id.len() - rest.len()];
            format!("{sign}{fill}{rest}")
        }
        None => format!("{fill}{id}"),
    }
}

/// Geometry of the shard tree rooted at a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardLayout {
    root: PathBuf,
    padding: usize,
    segment_width: usize,
    segments: usize,
}

impl ShardLayout {
    /// # Errors
    /// Fails when `segment_width` is zero or when `padding` is shorter than
    /// `segment_width * segments`, since a padded identifier could then run
    /// out of characters before the last directory level.
    pub fn new(
        root: impl AsRef<Path>,
        padding: usize,
        segment_width: usize,
        segments: usize,
    ) -> Result<Self> {
        if segment_width == 0 {
            bail!("shard segment width must be non-zero");
        }
        let needed = segment_width.saturating_mul(segments);
        if padding < needed {
            bail!(
                "padding {padding} cannot hold {segments} segments of width {segment_width} ({needed} chars)"
            );
        }
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            padding,
            segment_width,
            segments,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Zero-padded form of `id` for this layout.
    #[must_use]
    pub fn padded(&self, id: &str) -> String {
        zero_pad(id, self.padding)
    }

    /// Directory segments for `id`, e.g. `["00", "03", "16", "84"]`.
    ///
    /// # Errors
    /// Rejects identifiers containing a path separator or NUL, and those
    /// whose padded form slices into a `.` or `..` segment.
    pub fn segments(&self, id: &str) -> Result<Vec<String>> {
        check_identifier(id)?;
        let chars: Vec<char> = self.padded(id).chars().collect();
        let segments: Vec<String> = chars
            .chunks(self.segment_width)
            .take(self.segments)
            .map(|c| c.iter().collect())
            .collect();
        if let Some(bad) = segments.iter().find(|s| !is_normal_component(s)) {
            bail!("identifier {id:?} yields shard segment {bad:?} outside the tree");
        }
        Ok(segments)
    }

    /// Shard directory for `id`, relative to the layout root.
    ///
    /// # Errors
    /// See [`ShardLayout::segments`].
    pub fn relative_dir(&self, id: &str) -> Result<PathBuf> {
        Ok(self.segments(id)?.iter().collect())
    }

    /// Absolute (root-joined) shard directory for `id`.
    ///
    /// # Errors
    /// See [`ShardLayout::segments`].
    pub fn dir_for(&self, id: &str) -> Result<PathBuf> {
        Ok(self.root.join(self.relative_dir(id)?))
    }

    /// `<padded id>.json`
    #[must_use]
    pub fn file_name(&self, id: &str) -> String {
        format!("{}.json", self.padded(id))
    }

    /// Full output path for `id`: shard directory plus file name.
    ///
    /// # Errors
    /// See [`ShardLayout::segments`].
    pub fn file_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.dir_for(id)?.join(self.file_name(id)))
    }

    /// Create the shard directory chain for `id` if needed and return it.
    ///
    /// Idempotent: an existing chain is left as is.
    ///
    /// # Errors
    /// Returns an error for an invalid identifier or if the directories
    /// cannot be created.
    pub fn ensure_dir(&self, id: &str) -> Result<PathBuf> {
        let dir = self.dir_for(id)?;
        create_dir_all(&dir).with_context(|| format!("mkdir -p {}", dir.display()))?;
        Ok(dir)
    }
}

/// `seg` is a single plain path component (not `.`, `..`, a root or a prefix).
fn is_normal_component(seg: &str) -> bool {
    let mut components = Path::new(seg).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == seg
    )
}

fn check_identifier(id: &str) -> Result<()> {
    if id.contains(['/', '\\', '\0']) {
        bail!("identifier {id:?} contains a path separator");
    }
    Ok(())
}
