//! Load chain nodes and the Cartesian expansion over hash alternatives.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use super::cache::AssetCache;
use crate::chain::{AssetRole, BootAsset};

/// Mapping from boot asset roles to bootloader directory names under the
/// cache root. Supplied per call; there is no defaulting.
pub type RoleToBootloaderDir = HashMap<AssetRole, String>;

/// Errors from load chain expansion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadChainError {
    /// A referenced asset file is not materialized in the cache.
    ///
    /// The caller may re-populate the cache and retry.
    #[error("file {} not found in boot assets cache", path.display())]
    CacheMiss {
        /// Path of the missing cache entry.
        path: PathBuf,
    },

    /// The role to directory map has no entry for a role that was
    /// reached during expansion.
    ///
    /// This is a configuration or programming bug, not recoverable by
    /// retrying.
    #[error("internal error: no bootloader name for boot asset role \"{role}\"")]
    UnknownRole {
        /// The role with no bootloader directory mapping.
        role: AssetRole,
    },
}

/// A concrete file participating in a measured boot sequence.
///
/// Either `snap` is set and `path` is relative to that snap's content,
/// or `snap` is empty and `path` is an absolute file in the boot assets
/// cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootFile {
    /// Snap the file lives in; empty for cache entries.
    pub snap: String,
    /// File path; absolute for cache entries, snap-relative otherwise.
    pub path: PathBuf,
    /// Boot role the file is measured under.
    pub role: AssetRole,
}

impl BootFile {
    /// Creates a boot file inside the snap `snap`.
    #[must_use]
    pub fn new(snap: impl Into<String>, path: impl Into<PathBuf>, role: AssetRole) -> Self {
        Self {
            snap: snap.into(),
            path: path.into(),
            role,
        }
    }

    /// Creates a boot file for an entry in the boot assets cache.
    #[must_use]
    pub fn in_cache(path: impl Into<PathBuf>, role: AssetRole) -> Self {
        Self {
            snap: String::new(),
            path: path.into(),
            role,
        }
    }
}

/// A node in the expanded tree of permissible boot sequences.
///
/// Inner nodes list the alternatives that may be loaded next; in a fully
/// expanded forest every leaf is the kernel file. Consumers must not
/// mutate the tree during traversal and must not rely on node identity
/// for equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadChain {
    /// The file loaded at this point in the sequence.
    pub boot_file: BootFile,
    /// The alternatives that may be loaded next; empty for leaves.
    pub next: Vec<LoadChain>,
}

impl LoadChain {
    /// Creates a leaf node.
    #[must_use]
    pub fn new(boot_file: BootFile) -> Self {
        Self {
            boot_file,
            next: Vec::new(),
        }
    }

    /// Creates a node with the given successors.
    #[must_use]
    pub fn with_next(boot_file: BootFile, next: Vec<LoadChain>) -> Self {
        Self { boot_file, next }
    }

    /// Returns true if this node has no successors.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.next.is_empty()
    }

    /// Counts the root-to-leaf paths below and including this node.
    #[must_use]
    pub fn path_count(&self) -> usize {
        if self.next.is_empty() {
            1
        } else {
            self.next.iter().map(LoadChain::path_count).sum()
        }
    }
}

/// Expands an ordered asset sequence into the forest of concrete load
/// chains, terminating every path with the kernel file `kernel`.
///
/// For each hash alternative of the first asset a root node is produced
/// pointing at the corresponding cache entry; its successors are the
/// expansion of the remaining assets. The result enumerates the
/// Cartesian product of hash alternatives across all stages, so a forest
/// over per-stage hash counts `k0, k1, ...` holds `k0 * k1 * ...`
/// root-to-leaf paths. An empty asset sequence yields a single chain
/// holding only the kernel.
///
/// # Errors
///
/// Returns [`LoadChainError::CacheMiss`] for the first `(asset, hash)`
/// pair whose cache entry is not materialized, probing stages
/// outermost-first and hashes in input order, or
/// [`LoadChainError::UnknownRole`] when a reached asset's role has no
/// directory mapping. Role lookup happens per stage before that stage's
/// probes, so an unmapped role on a later stage is only reported once
/// every earlier probe succeeded. On error no partial forest is
/// returned.
pub fn boot_assets_to_load_chains(
    assets: &[BootAsset],
    kernel: &BootFile,
    roles: &RoleToBootloaderDir,
    cache: &AssetCache,
) -> Result<Vec<LoadChain>, LoadChainError> {
    let Some((asset, rest)) = assets.split_first() else {
        return Ok(vec![LoadChain::new(kernel.clone())]);
    };

    let dir = roles
        .get(&asset.role)
        .ok_or(LoadChainError::UnknownRole { role: asset.role })?;

    let mut chains = Vec::with_capacity(asset.hashes.len());
    for hash in &asset.hashes {
        let probe = cache.probe(dir, &asset.name, hash);
        if !probe.present {
            return Err(LoadChainError::CacheMiss { path: probe.path });
        }
        let next = boot_assets_to_load_chains(rest, kernel, roles, cache)?;
        chains.push(LoadChain::with_next(
            BootFile::in_cache(probe.path, asset.role),
            next,
        ));
    }
    Ok(chains)
}
