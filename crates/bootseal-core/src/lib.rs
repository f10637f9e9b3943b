//! # bootseal-core
//!
//! Boot chain canonicalization and load chain expansion for a measured
//! boot subsystem.
//!
//! The crate takes sets of possible boot paths, each a sequence of
//! firmware, bootloader and kernel components identified by their
//! cryptographic hashes, and produces:
//!
//! - **Canonical chains**: a deterministically ordered variant of the
//!   chains whose serialized bytes are suitable as stable input to
//!   key-sealing policy derivation, together with a cheap equality check
//!   that decides whether a reseal is required.
//! - **Load chains**: an expanded tree of concrete on-disk file load
//!   sequences enumerating every permissible boot path, for the
//!   measurement engine to walk.
//!
//! ## Example
//!
//! ```
//! use bootseal_core::{
//!     AssetRole, BootAsset, BootChain, equal_for_reseal, to_predictable_boot_chains,
//! };
//!
//! let chain = BootChain {
//!     brand_id: "mybrand".to_string(),
//!     model: "foo".to_string(),
//!     grade: "dangerous".to_string(),
//!     asset_chain: vec![BootAsset::new(AssetRole::Recovery, "shim", ["b", "a"])],
//!     kernel: "pc-kernel".to_string(),
//!     ..BootChain::default()
//! };
//!
//! let predictable = to_predictable_boot_chains(std::slice::from_ref(&chain));
//! assert!(equal_for_reseal(&predictable, &predictable));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canonical;
pub mod chain;
pub mod loadchain;

pub use canonical::{canonical_bytes, canonical_chain_bytes, equal_for_reseal};
pub use chain::{
    AssetRole, BootAsset, BootChain, PredictableBootChains, to_predictable_boot_chains,
};
pub use loadchain::{
    AssetCache, BootFile, CacheProbe, LoadChain, LoadChainError, RoleToBootloaderDir,
    boot_assets_to_load_chains,
};
