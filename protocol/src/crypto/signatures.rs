//! # Digital Signatures
//!
//! Transactions are signed over their 32-byte identifier with ECDSA on
//! secp256k1. The identifier is already a digest, so signing uses the
//! prehash interface directly instead of hashing a second time.
//!
//! Signatures are carried as 64 raw bytes, `r || s`, and hex-encoded at any
//! textual boundary. The client core never verifies them; that happens at
//! consensus time. [`verify_hash`] exists for tests and for the CLI's local
//! signing path to sanity-check its own output.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::Signature as EcdsaSignature;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::encoding::{bytes64, decode_hex_field};
use super::keys::{PrivateKey, PublicKey};
use crate::config::SIGNATURE_LEN;
use crate::error::{ClientError, ClientResult};

/// One 64-byte signature slot. All zeroes means "unsigned".
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "bytes64")] pub [u8; SIGNATURE_LEN]);

impl Signature {
    pub const EMPTY: Signature = Signature([0u8; SIGNATURE_LEN]);

    pub fn from_hex(s: &str) -> ClientResult<Self> {
        Ok(Signature(decode_hex_field(s, "signature")?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; SIGNATURE_LEN]
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Signature(empty)")
        } else {
            write!(f, "Signature({}…)", &self.to_hex()[..16])
        }
    }
}

/// Sign a 32-byte transaction hash.
pub fn sign_hash(key: &PrivateKey, hash: &[u8; 32]) -> ClientResult<Signature> {
    let sig: EcdsaSignature = key
        .signing_key()
        .sign_prehash(hash)
        .map_err(|e| ClientError::Crypto(format!("signing failed: {e}")))?;
    let mut out = [0u8; SIGNATURE_LEN];
    out.copy_from_slice(&sig.to_bytes());
    Ok(Signature(out))
}

/// Check `signature` against `hash` under `key`. Malformed signatures simply
/// fail verification.
pub fn verify_hash(key: &PublicKey, hash: &[u8; 32], signature: &Signature) -> bool {
    match EcdsaSignature::from_slice(&signature.0) {
        Ok(sig) => key.verifying_key().verify_prehash(hash, &sig).is_ok(),
        Err(_) => false,
    }
}
