//! Expansion of boot asset sequences into concrete load chain trees.
//!
//! A boot chain names each stage by its acceptable hashes; the
//! measurement engine needs the concrete on-disk files instead. The
//! expander takes an ordered asset sequence, a kernel boot file and a
//! role to bootloader-directory mapping, and materializes the Cartesian
//! product of hash alternatives as a forest of [`LoadChain`] nodes:
//!
//! ```text
//! shim-hash0 ─ loader-hash0 ─ kernel.efi
//!           └─ loader-hash1 ─ kernel.efi
//! shim-hash1 ─ loader-hash0 ─ kernel.efi
//!           └─ loader-hash1 ─ kernel.efi
//! ```
//!
//! Every asset file is probed in the boot assets cache before it is
//! placed in the tree; a missing file or an unmapped role aborts the
//! whole expansion, no partial forest is returned.

mod cache;
mod expand;


pub use cache::{AssetCache, CacheProbe};
pub use expand::{
    BootFile, LoadChain, LoadChainError, RoleToBootloaderDir, boot_assets_to_load_chains,
};
