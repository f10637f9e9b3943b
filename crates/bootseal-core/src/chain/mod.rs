//! Boot chain data model and canonicalization.
//!
//! A [`BootChain`] describes one possible boot path: the device model
//! identity, an ordered sequence of measured [`BootAsset`] stages, and
//! the kernel that terminates the chain. Each asset may carry several
//! acceptable hashes (for example during an asset update, when both the
//! old and the new binary must remain bootable).
//!
//! The raw form preserves input order everywhere. The canonical
//! ("predictable") form totally orders every free dimension: hash lists
//! ascending, asset chains by the asset order, chain lists by the chain
//! order. Two inputs denoting the same set of boot possibilities have
//! identical canonical forms, which is what makes the serialized bytes
//! usable as reseal-decision input.
//!
//! Canonicalization is non-destructive and idempotent: `to_predictable`
//! returns a new value, leaves its input untouched, and applying it to an
//! already canonical value is the identity.

mod asset;
mod boot_chain;


pub use asset::{AssetRole, BootAsset};
pub use boot_chain::{BootChain, PredictableBootChains, to_predictable_boot_chains};
