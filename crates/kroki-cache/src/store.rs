//! File-based diagram store.
//!
//! [`DiagramCache`] keeps each rendered diagram as a single file named after
//! its content digest:
//!
//! ```text
//! {root}/
//! +-- 3f5a...e1.svg
//! +-- 9bc0...42.svg
//! ```
//!
//! Entries are never invalidated. Clearing the directory is the only way to
//! force a re-render.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::key::{DiagramKey, Digest};

/// Content-addressed cache rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct DiagramCache {
    root: PathBuf,
    extension: String,
}

impl DiagramCache {
    /// Open the cache at `root`, creating the directory and its parents.
    ///
    /// `extension` is the file extension of the output format (e.g. "svg").
    pub fn open(root: impl Into<PathBuf>, extension: &str) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "diagram cache ready");
        Ok(Self {
            root,
            extension: extension.to_owned(),
        })
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compute the digest for a diagram.
    #[must_use]
    pub fn key_for(&self, diagram_type: &str, source: &str) -> Digest {
        DiagramKey::new(diagram_type, source).digest()
    }

    /// Path of the cache file for `digest`.
    #[must_use]
    pub fn path_for(&self, digest: &Digest) -> PathBuf {
        self.root.join(format!("{digest}.{}", self.extension))
    }

    /// Whether a cache file exists at `path`.
    #[must_use]
    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Persist rendered bytes at `path`.
    ///
    /// Data is written to a temporary file in the same directory and renamed
    /// into place, so readers never observe a partially written entry.
    pub fn store(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = path.parent().unwrap_or(self.root.as_path());
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "stored diagram");
        Ok(())
    }
}
