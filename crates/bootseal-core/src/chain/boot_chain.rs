//! Boot chains and their canonical list form.

use std::cmp::Ordering;
use std::slice;

use serde::{Deserialize, Serialize};

use super::asset::BootAsset;

/// One possible boot path: model identity, the ordered asset stages, and
/// the kernel terminating the chain.
///
/// Field declaration order is the serialization order and is part of the
/// sealed-policy compatibility contract; it must not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BootChain {
    /// Brand account the model belongs to.
    pub brand_id: String,
    /// Device model name.
    pub model: String,
    /// Model grade, e.g. `dangerous` or `signed`.
    pub grade: String,
    /// ID of the key the model assertion was signed with.
    pub model_sign_key_id: String,
    /// Measured stages, earliest first.
    pub asset_chain: Vec<BootAsset>,
    /// Kernel snap name.
    pub kernel: String,
    /// Kernel snap revision.
    pub kernel_revision: String,
    /// Full kernel command line, byte-exact.
    pub kernel_cmdline: String,
}

impl BootChain {
    /// Returns a copy of the chain with a fully canonical asset chain:
    /// every asset's hash list sorted, then the assets sorted by the
    /// asset total order.
    ///
    /// Identity and kernel fields copy through unchanged. The input is
    /// left untouched and the operation is idempotent.
    #[must_use]
    pub fn to_predictable(&self) -> Self {
        let mut asset_chain: Vec<BootAsset> = self
            .asset_chain
            .iter()
            .map(BootAsset::to_predictable)
            .collect();
        asset_chain.sort();
        Self {
            asset_chain,
            ..self.clone()
        }
    }
}

/// Total order: model, grade, brand, sign key, asset chain, kernel,
/// kernel revision, kernel command line.
///
/// Model identity dominates because a model change forces a reseal
/// regardless; assets dominate kernel because PCR values follow
/// measurement order. Sequences compare element-wise with a matching
/// shorter prefix ordering first.
impl Ord for BootChain {
    fn cmp(&self, other: &Self) -> Ordering {
        self.model
            .cmp(&other.model)
            .then_with(|| self.grade.cmp(&other.grade))
            .then_with(|| self.brand_id.cmp(&other.brand_id))
            .then_with(|| self.model_sign_key_id.cmp(&other.model_sign_key_id))
            .then_with(|| self.asset_chain.cmp(&other.asset_chain))
            .then_with(|| self.kernel.cmp(&other.kernel))
            .then_with(|| self.kernel_revision.cmp(&other.kernel_revision))
            .then_with(|| self.kernel_cmdline.cmp(&other.kernel_cmdline))
    }
}

impl PartialOrd for BootChain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A list of boot chains in canonical form.
///
/// Produced by [`to_predictable_boot_chains`]: every chain is canonical
/// and the list is sorted by the chain total order. Identical chains are
/// preserved, not collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictableBootChains(Vec<BootChain>);

impl PredictableBootChains {
    /// Returns the chains as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[BootChain] {
        &self.0
    }

    /// Returns the number of chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no chains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the chains in canonical order.
    pub fn iter(&self) -> slice::Iter<'_, BootChain> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a PredictableBootChains {
    type Item = &'a BootChain;
    type IntoIter = slice::Iter<'a, BootChain>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Canonicalizes every chain and sorts the list by the chain total order.
///
/// The sort is stable, so identical chains keep their relative input
/// order. An empty input yields an empty canonical list.
#[must_use]
pub fn to_predictable_boot_chains(chains: &[BootChain]) -> PredictableBootChains {
    let mut predictable: Vec<BootChain> = chains.iter().map(BootChain::to_predictable).collect();
    predictable.sort();
    PredictableBootChains(predictable)
}
