//! Presence probe for the boot assets cache.

use std::path::{Path, PathBuf};

use tracing::trace;

/// Handle to the content-addressed boot assets cache directory.
///
/// Cache entries are files named `<asset-name>-<hash>` under a
/// per-bootloader subdirectory of the cache root. Contents are never
/// read here: trust is rooted in the canonical name, and hash
/// verification happens upstream when assets are added to the cache.
/// Writers publish atomically by renaming into place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCache {
    root: PathBuf,
}

/// Outcome of a cache probe: the resolved entry path and whether a file
/// is materialized there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheProbe {
    /// Absolute path of the cache entry.
    pub path: PathBuf,
    /// Whether the entry existed at probe time.
    pub present: bool,
}

impl AssetCache {
    /// Creates a handle for the cache rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the cache entry for `name` with `hash` under
    /// the bootloader directory `dir`.
    #[must_use]
    pub fn entry_path(&self, dir: &str, name: &str, hash: &str) -> PathBuf {
        self.root.join(dir).join(format!("{name}-{hash}"))
    }

    /// Resolves the cache entry for `name` with `hash` under `dir` and
    /// checks for its presence.
    ///
    /// A bare stat; this is the only filesystem interaction in the
    /// crate.
    #[must_use]
    pub fn probe(&self, dir: &str, name: &str, hash: &str) -> CacheProbe {
        let path = self.entry_path(dir, name, hash);
        let present = path.exists();
        trace!(path = %path.display(), present, "probed boot assets cache");
        CacheProbe { path, present }
    }
}
