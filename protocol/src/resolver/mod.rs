//! # Key / Parameter Resolver
//!
//! Every CLI flag and REST field that names a key or a chameleon parameter
//! set accepts two shapes:
//!
//! - a **file reference**: any string containing `.txt`. The material is
//!   loaded from disk (and for public keys and parameters, generated and
//!   written on first use);
//! - a **direct encoding**: the hex fields themselves, separated by any
//!   whitespace, or glued together into one string of fixed-width fields.
//!
//! An empty string means "not supplied" and resolves to `Ok(None)`. Callers
//! decide whether that is an error; [`args`] does that for each request.
//!
//! | Material          | Fields              | Single-string widths |
//! |-------------------|---------------------|----------------------|
//! | public key        | `X Y` (or `X Y D`)  | 128 or 192 chars     |
//! | private key       | `X Y D`             | 192 chars            |
//! | chameleon params  | `g p q hk [tk]`     | 256 or 320 chars     |
//!
//! Resolution of a direct encoding is a pure function of the input string.
//! Resolution of a file reference is stable once the file exists.

pub mod args;

use std::path::Path;

use crate::config::{CH_PARAM_HEX_LEN, KEY_FIELD_HEX_LEN, KEY_FILE_MARKER};
use crate::crypto::chameleon::{get_or_create_params_from_file, ChParams};
use crate::crypto::keys::{
    extract_key_from_file, get_or_create_public_key_from_file, PrivateKey, PublicKey,
};
use crate::error::{ClientError, ClientResult};

fn is_file_reference(input: &str) -> bool {
    input.contains(KEY_FILE_MARKER)
}

/// Split `input` into fields. Whitespace wins; a single unbroken string
/// whose length is one of `widths × field_len` is sliced instead.
fn split_fields<'a>(input: &'a str, field_len: usize, widths: &[usize]) -> Vec<&'a str> {
    let fields: Vec<&str> = input.split_whitespace().collect();
    if fields.len() != 1 {
        return fields;
    }
    let single = fields[0];
    if !single.is_ascii() {
        return fields;
    }
    match widths.iter().find(|&&n| single.len() == n * field_len) {
        Some(&n) => (0..n)
            .map(|i| &single[i * field_len..(i + 1) * field_len])
            .collect(),
        None => fields,
    }
}

/// Resolve a public key. File references are created on first use.
pub fn resolve_public_key(input: &str) -> ClientResult<Option<PublicKey>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if is_file_reference(input) {
        return get_or_create_public_key_from_file(Path::new(input)).map(Some);
    }

    match split_fields(input, KEY_FIELD_HEX_LEN, &[2, 3]).as_slice() {
        [x, y] | [x, y, _] => PublicKey::from_hex_fields(x, y).map(Some),
        other => Err(ClientError::Decoding(format!(
            "public key needs 2 or 3 fields, got {}",
            other.len()
        ))),
    }
}

/// Resolve a private key. A referenced key file must already exist.
pub fn resolve_private_key(input: &str) -> ClientResult<Option<PrivateKey>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if is_file_reference(input) {
        return extract_key_from_file(Path::new(input)).map(Some);
    }

    match split_fields(input, KEY_FIELD_HEX_LEN, &[3]).as_slice() {
        [x, y, d] => PrivateKey::from_hex_fields(x, y, d).map(Some),
        other => Err(ClientError::Decoding(format!(
            "private key needs 3 fields, got {}",
            other.len()
        ))),
    }
}

/// Resolve a chameleon parameter set. File references are created (with a
/// fresh trapdoor) on first use.
pub fn resolve_ch_params(input: &str) -> ClientResult<Option<ChParams>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    if is_file_reference(input) {
        return get_or_create_params_from_file(Path::new(input)).map(Some);
    }

    let fields = split_fields(input, CH_PARAM_HEX_LEN, &[4, 5]);
    ChParams::from_hex_fields(&fields).map(Some)
}

/// Resolve a validator commitment key into the bytes a stake transaction
/// carries: the 64-byte address of the commitment key pair.
pub fn resolve_commitment(input: &str) -> ClientResult<Option<Vec<u8>>> {
    Ok(resolve_public_key(input)?.map(|key| key.address().0.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;

    #[test]
    fn empty_input_is_not_requested() {
        assert!(resolve_public_key("").unwrap().is_none());
        assert!(resolve_private_key("   ").unwrap().is_none());
        assert!(resolve_ch_params("").unwrap().is_none());
        assert!(resolve_commitment("").unwrap().is_none());
    }

    #[test]
    fn public_key_from_whitespace_fields() {
        let key = PrivateKey::generate();
        let [x, y] = key.public_key().to_fields();
        let resolved = resolve_public_key(&format!("{x}\n{y}")).unwrap().unwrap();
        assert_eq!(resolved, key.public_key());
    }

    #[test]
    fn public_key_from_glued_fields() {
        let key = PrivateKey::generate();
        let [x, y, d] = key.to_fields();
        let two = resolve_public_key(&format!("{x}{y}")).unwrap().unwrap();
        let three = resolve_public_key(&format!("{x}{y}{d}")).unwrap().unwrap();
        assert_eq!(two, key.public_key());
        assert_eq!(three, key.public_key());
    }

    #[test]
    fn private_key_from_glued_and_split_fields() {
        let key = PrivateKey::generate();
        let [x, y, d] = key.to_fields();
        let glued = resolve_private_key(&format!("{x}{y}{d}")).unwrap().unwrap();
        let split = resolve_private_key(&format!("{x}\t{y} {d}")).unwrap().unwrap();
        assert_eq!(glued.address(), key.address());
        assert_eq!(split.address(), key.address());
    }

    #[test]
    fn wrong_field_count_is_a_decoding_error() {
        let key = PrivateKey::generate();
        let [x, _, _] = key.to_fields();
        assert!(matches!(resolve_public_key(&x), Err(ClientError::Decoding(_))));
        assert!(matches!(
            resolve_private_key(&format!("{x} {x}")),
            Err(ClientError::Decoding(_))
        ));
        assert!(matches!(resolve_ch_params("abcd"), Err(ClientError::Decoding(_))));
    }

    #[test]
    fn ch_params_glued_with_and_without_trapdoor() {
        let params = ChParams::generate(&mut test_rng()).unwrap();
        let full = params.to_fields().concat();
        let public = params.sanitized().to_fields().concat();

        let with_tk = resolve_ch_params(&full).unwrap().unwrap();
        let without_tk = resolve_ch_params(&public).unwrap().unwrap();
        assert_eq!(with_tk, params);
        assert!(with_tk.has_trapdoor());
        assert!(!without_tk.has_trapdoor());
    }

    #[test]
    fn ch_params_file_is_created_once_and_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chparams.txt");
        let arg = path.to_string_lossy().into_owned();

        let first = resolve_ch_params(&arg).unwrap().unwrap();
        let second = resolve_ch_params(&arg).unwrap().unwrap();
        assert_eq!(first, second);
        assert!(first.has_trapdoor());
    }

    #[test]
    fn private_key_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let arg = dir.path().join("missing.txt").to_string_lossy().into_owned();
        assert!(matches!(resolve_private_key(&arg), Err(ClientError::Resolution(_))));
    }

    #[test]
    fn public_key_file_reads_back_the_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let arg = dir.path().join("wallet.txt").to_string_lossy().into_owned();
        let first = resolve_public_key(&arg).unwrap().unwrap();
        let second = resolve_public_key(&arg).unwrap().unwrap();
        let private = resolve_private_key(&arg).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(private.public_key(), first);
    }

    #[test]
    fn commitment_is_the_key_address() {
        let key = PrivateKey::generate();
        let [x, y] = key.public_key().to_fields();
        let bytes = resolve_commitment(&format!("{x} {y}")).unwrap().unwrap();
        assert_eq!(bytes, key.address().0.to_vec());
    }
}
