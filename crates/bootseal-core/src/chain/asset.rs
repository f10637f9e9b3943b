//! Boot asset identity and total ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Role a boot asset is measured under.
///
/// Recovery assets are measured before run assets; the declaration order
/// here is the total order used when sorting asset chains. Roles are a
/// closed enumeration: unknown tags are rejected at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetRole {
    /// Asset of the recovery boot path.
    Recovery,
    /// Asset of the run boot path.
    Run,
}

impl AssetRole {
    /// Returns the serialized tag for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recovery => "recovery",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measurable boot stage: a named artifact and the hashes that are
/// acceptable for it.
///
/// `hashes` keeps input order in the raw form; [`BootAsset::to_predictable`]
/// sorts it ascending. Duplicate hashes are preserved, not collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootAsset {
    /// Boot role the asset is measured under.
    pub role: AssetRole,
    /// Asset name, e.g. `shim` or `loader`.
    pub name: String,
    /// Hex-encoded hashes acceptable for this asset, at least one.
    pub hashes: Vec<String>,
}

impl BootAsset {
    /// Creates an asset for `role` named `name` with the given hashes.
    #[must_use]
    pub fn new(
        role: AssetRole,
        name: impl Into<String>,
        hashes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            role,
            name: name.into(),
            hashes: hashes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a copy of the asset with its hash list sorted ascending.
    ///
    /// The input is left untouched and the operation is idempotent.
    #[must_use]
    pub fn to_predictable(&self) -> Self {
        let mut hashes = self.hashes.clone();
        hashes.sort();
        Self {
            role: self.role,
            name: self.name.clone(),
            hashes,
        }
    }
}

/// Total order: role, then name, then hash count ascending, then hashes
/// element-wise. Assets equal under this order are kept in their relative
/// input order by the stable sorts using it.
impl Ord for BootAsset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.role
            .cmp(&other.role)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.hashes.len().cmp(&other.hashes.len()))
            .then_with(|| self.hashes.cmp(&other.hashes))
    }
}

impl PartialOrd for BootAsset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
