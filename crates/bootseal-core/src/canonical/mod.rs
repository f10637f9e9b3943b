//! Deterministic byte encoding of canonical boot chains.
//!
//! The serialized form is the compatibility surface with previously
//! sealed policies: equal canonical inputs must produce identical bytes
//! on every host, independent of map iteration order, locale or
//! allocator. The encoder is therefore hand-written with a fixed key
//! order and minimal JSON escaping rather than relying on a serializer's
//! defaults.
//!
//! Key order per chain object: `brand-id`, `model`, `grade`,
//! `model-sign-key-id`, `asset-chain`, `kernel`, `kernel-revision`,
//! `kernel-cmdline`. Per asset object: `role`, `name`, `hashes`. No
//! whitespace between tokens; empty strings are emitted as `""`.
//!
//! The derived `Serialize` impls on the chain types use the same field
//! order and escaping, and a test pins the two byte-equal; the emitter
//! here is the authority for the contract.

use std::fmt::Write as _;

use crate::chain::{BootAsset, BootChain, PredictableBootChains};

/// Serializes a canonical chain list to its deterministic byte form.
///
/// The top level is an array of chain objects in canonical order. This
/// function does not fail.
#[must_use]
pub fn canonical_bytes(chains: &PredictableBootChains) -> Vec<u8> {
    let mut out = String::new();
    out.push('[');
    for (i, chain) in chains.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        emit_chain(chain, &mut out);
    }
    out.push(']');
    out.into_bytes()
}

/// Serializes a single canonical chain to its deterministic byte form.
#[must_use]
pub fn canonical_chain_bytes(chain: &BootChain) -> Vec<u8> {
    let mut out = String::new();
    emit_chain(chain, &mut out);
    out.into_bytes()
}

/// Compares two canonical chain lists for the reseal decision.
///
/// Equality is byte equality of the serialized forms, so any two inputs
/// an operator would consider equivalent yield the same verdict. Two
/// empty lists are equal; an empty list never equals a non-empty one.
#[must_use]
pub fn equal_for_reseal(a: &PredictableBootChains, b: &PredictableBootChains) -> bool {
    canonical_bytes(a) == canonical_bytes(b)
}

fn emit_chain(chain: &BootChain, out: &mut String) {
    out.push('{');
    emit_str_field("brand-id", &chain.brand_id, out);
    out.push(',');
    emit_str_field("model", &chain.model, out);
    out.push(',');
    emit_str_field("grade", &chain.grade, out);
    out.push(',');
    emit_str_field("model-sign-key-id", &chain.model_sign_key_id, out);
    out.push(',');
    emit_string("asset-chain", out);
    out.push(':');
    out.push('[');
    for (i, asset) in chain.asset_chain.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        emit_asset(asset, out);
    }
    out.push(']');
    out.push(',');
    emit_str_field("kernel", &chain.kernel, out);
    out.push(',');
    emit_str_field("kernel-revision", &chain.kernel_revision, out);
    out.push(',');
    emit_str_field("kernel-cmdline", &chain.kernel_cmdline, out);
    out.push('}');
}

fn emit_asset(asset: &BootAsset, out: &mut String) {
    out.push('{');
    emit_str_field("role", asset.role.as_str(), out);
    out.push(',');
    emit_str_field("name", &asset.name, out);
    out.push(',');
    emit_string("hashes", out);
    out.push(':');
    out.push('[');
    for (i, hash) in asset.hashes.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        emit_string(hash, out);
    }
    out.push(']');
    out.push('}');
}

fn emit_str_field(key: &str, value: &str, out: &mut String) {
    emit_string(key, out);
    out.push(':');
    emit_string(value, out);
}

/// Emits a string with minimal escaping: only `"`, `\` and the control
/// characters U+0000 through U+001F are escaped, with the short escapes
/// where JSON defines them.
fn emit_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if ('\u{0000}'..='\u{001F}').contains(&c) => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            },
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{AssetRole, to_predictable_boot_chains};

    fn asset(role: AssetRole, name: &str, hashes: &[&str]) -> BootAsset {
        BootAsset::new(role, name, hashes.iter().copied())
    }

    fn full_chain() -> BootChain {
        BootChain {
            brand_id: "mybrand".to_string(),
            model: "foo".to_string(),
            grade: "dangerous".to_string(),
            model_sign_key_id: "my-key-id".to_string(),
            asset_chain: vec![
                asset(AssetRole::Run, "loader", &["c", "d"]),
                asset(AssetRole::Recovery, "shim", &["b", "a"]),
                asset(AssetRole::Recovery, "loader", &["d"]),
            ],
            kernel: "pc-kernel".to_string(),
            kernel_revision: "1234".to_string(),
            kernel_cmdline: "foo=bar baz=0x123".to_string(),
        }
    }

    #[test]
    fn serializes_assets_only_chain() {
        let bc = BootChain {
            asset_chain: vec![
                asset(AssetRole::Run, "loader", &["z"]),
                asset(AssetRole::Recovery, "shim", &["b"]),
                asset(AssetRole::Run, "loader", &["d", "c"]),
                asset(AssetRole::Run, "1oader", &["e", "d"]),
                asset(AssetRole::Recovery, "loader", &["e", "d"]),
                asset(AssetRole::Run, "0oader", &["z", "x"]),
            ],
            ..BootChain::default()
        };

        let predictable = bc.to_predictable();
        assert_eq!(
            String::from_utf8(canonical_chain_bytes(&predictable)).unwrap(),
            r#"{"brand-id":"","model":"","grade":"","model-sign-key-id":"","asset-chain":[{"role":"recovery","name":"loader","hashes":["d","e"]},{"role":"recovery","name":"shim","hashes":["b"]},{"role":"run","name":"0oader","hashes":["x","z"]},{"role":"run","name":"1oader","hashes":["d","e"]},{"role":"run","name":"loader","hashes":["z"]},{"role":"run","name":"loader","hashes":["c","d"]}],"kernel":"","kernel-revision":"","kernel-cmdline":""}"#
        );
    }

    #[test]
    fn serializes_full_chain() {
        let predictable = full_chain().to_predictable();
        assert_eq!(
            String::from_utf8(canonical_chain_bytes(&predictable)).unwrap(),
            r#"{"brand-id":"mybrand","model":"foo","grade":"dangerous","model-sign-key-id":"my-key-id","asset-chain":[{"role":"recovery","name":"loader","hashes":["d"]},{"role":"recovery","name":"shim","hashes":["a","b"]},{"role":"run","name":"loader","hashes":["c","d"]}],"kernel":"pc-kernel","kernel-revision":"1234","kernel-cmdline":"foo=bar baz=0x123"}"#
        );
    }

    #[test]
    fn serializes_chain_list_in_canonical_order() {
        // Input order: signed grade first, then dangerous with a run
        // loader stage, then the shorter recovery-only dangerous chain.
        let chains = [
            BootChain {
                brand_id: "mybrand".to_string(),
                model: "foo".to_string(),
                grade: "signed".to_string(),
                model_sign_key_id: "my-key-id".to_string(),
                asset_chain: vec![
                    asset(AssetRole::Recovery, "shim", &["x", "y"]),
                    asset(AssetRole::Recovery, "loader", &["c", "d"]),
                    asset(AssetRole::Run, "loader", &["z", "x"]),
                ],
                kernel: "pc-kernel-other".to_string(),
                kernel_revision: "2345".to_string(),
                kernel_cmdline: "foo".to_string(),
            },
            BootChain {
                brand_id: "mybrand".to_string(),
                model: "foo".to_string(),
                grade: "dangerous".to_string(),
                model_sign_key_id: "my-key-id".to_string(),
                asset_chain: vec![
                    asset(AssetRole::Recovery, "shim", &["y", "x"]),
                    asset(AssetRole::Recovery, "loader", &["c", "d"]),
                    asset(AssetRole::Run, "loader", &["b", "a"]),
                ],
                kernel: "pc-kernel-other".to_string(),
                kernel_revision: "1234".to_string(),
                kernel_cmdline: "foo".to_string(),
            },
            BootChain {
                brand_id: "mybrand".to_string(),
                model: "foo".to_string(),
                grade: "dangerous".to_string(),
                model_sign_key_id: "my-key-id".to_string(),
                asset_chain: vec![
                    asset(AssetRole::Recovery, "shim", &["y", "x"]),
                    asset(AssetRole::Recovery, "loader", &["c", "d"]),
                ],
                kernel: "pc-kernel-other".to_string(),
                kernel_revision: "12".to_string(),
                kernel_cmdline: "foo".to_string(),
            },
        ];

        let predictable = to_predictable_boot_chains(&chains);
        // The recovery-only chain sorts first (matching shorter asset
        // prefix), then the dangerous run chain, then the signed grade.
        let expected = concat!(
            r#"[{"brand-id":"mybrand","model":"foo","grade":"dangerous","model-sign-key-id":"my-key-id","asset-chain":[{"role":"recovery","name":"loader","hashes":["c","d"]},{"role":"recovery","name":"shim","hashes":["x","y"]}],"kernel":"pc-kernel-other","kernel-revision":"12","kernel-cmdline":"foo"},"#,
            r#"{"brand-id":"mybrand","model":"foo","grade":"dangerous","model-sign-key-id":"my-key-id","asset-chain":[{"role":"recovery","name":"loader","hashes":["c","d"]},{"role":"recovery","name":"shim","hashes":["x","y"]},{"role":"run","name":"loader","hashes":["a","b"]}],"kernel":"pc-kernel-other","kernel-revision":"1234","kernel-cmdline":"foo"},"#,
            r#"{"brand-id":"mybrand","model":"foo","grade":"signed","model-sign-key-id":"my-key-id","asset-chain":[{"role":"recovery","name":"loader","hashes":["c","d"]},{"role":"recovery","name":"shim","hashes":["x","y"]},{"role":"run","name":"loader","hashes":["x","z"]}],"kernel":"pc-kernel-other","kernel-revision":"2345","kernel-cmdline":"foo"}]"#,
        );
        assert_eq!(String::from_utf8(canonical_bytes(&predictable)).unwrap(), expected);
    }

    #[test]
    fn serde_and_emitter_agree() {
        let chains = [full_chain()];
        let predictable = to_predictable_boot_chains(&chains);
        assert_eq!(
            serde_json::to_vec(&predictable).unwrap(),
            canonical_bytes(&predictable)
        );
    }

    #[test]
    fn escapes_strings_minimally() {
        let bc = BootChain {
            kernel_cmdline: "say \"hi\" \\ tab\there\nnull\u{0000}".to_string(),
            ..BootChain::default()
        };
        let bytes = canonical_chain_bytes(&bc.to_predictable());
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains(r#"say \"hi\" \\ tab\there\nnull\u0000"#));

        // The derived serializer escapes identically.
        let chains = to_predictable_boot_chains(std::slice::from_ref(&bc));
        assert_eq!(serde_json::to_vec(&chains).unwrap(), canonical_bytes(&chains));
    }

    #[test]
    fn serialization_is_idempotent_over_canonicalization() {
        let chains = [full_chain()];
        let once = to_predictable_boot_chains(&chains);
        let twice = to_predictable_boot_chains(once.as_slice());
        assert_eq!(canonical_bytes(&once), canonical_bytes(&twice));
    }

    #[test]
    fn equal_for_reseal_across_reordering() {
        let chains = [full_chain()];
        let pb = to_predictable_boot_chains(&chains);

        // Same chain with assets and hashes already in canonical order.
        let sorted = [BootChain {
            brand_id: "mybrand".to_string(),
            model: "foo".to_string(),
            grade: "dangerous".to_string(),
            model_sign_key_id: "my-key-id".to_string(),
            asset_chain: vec![
                asset(AssetRole::Recovery, "loader", &["d"]),
                asset(AssetRole::Recovery, "shim", &["a", "b"]),
                asset(AssetRole::Run, "loader", &["c", "d"]),
            ],
            kernel: "pc-kernel".to_string(),
            kernel_revision: "1234".to_string(),
            kernel_cmdline: "foo=bar baz=0x123".to_string(),
        }];
        let pb_other = to_predictable_boot_chains(&sorted);

        assert!(equal_for_reseal(&pb, &pb_other));
    }

    #[test]
    fn equal_for_reseal_simple() {
        let empty = PredictableBootChains::default();
        assert!(equal_for_reseal(&empty, &empty));

        let just_one = [BootChain {
            brand_id: "mybrand".to_string(),
            model: "foo".to_string(),
            grade: "dangerous".to_string(),
            model_sign_key_id: "my-key-id".to_string(),
            asset_chain: vec![asset(AssetRole::Run, "loader", &["c", "d"])],
            kernel: "pc-kernel-other".to_string(),
            kernel_revision: "1234".to_string(),
            kernel_cmdline: "foo".to_string(),
        }];
        let pb_just_one = to_predictable_boot_chains(&just_one);
        assert!(equal_for_reseal(&pb_just_one, &pb_just_one));
        assert!(!equal_for_reseal(&pb_just_one, &empty));

        let mut more = just_one.to_vec();
        more.push(BootChain {
            asset_chain: vec![asset(AssetRole::Run, "loader", &["d", "e"])],
            ..just_one[0].clone()
        });
        let pb_more = to_predictable_boot_chains(&more);
        assert!(!equal_for_reseal(&pb_more, &pb_just_one));
        assert!(equal_for_reseal(&pb_more, &pb_more));
    }

    #[test]
    fn distinct_canonical_inputs_have_distinct_bytes() {
        let one = to_predictable_boot_chains(&[full_chain()]);
        let mut other_chain = full_chain();
        other_chain.kernel_revision = "1235".to_string();
        let other = to_predictable_boot_chains(&[other_chain]);
        assert_ne!(canonical_bytes(&one), canonical_bytes(&other));
    }
}
