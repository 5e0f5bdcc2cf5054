//! # Hashing Utilities
//!
//! SHA3-256 is the only ordinary digest the client uses. It produces:
//!
//! - **content hashes** — the mutable "message" fed into the chameleon hash,
//!   computed over a transaction minus its signatures and check string;
//! - **address hashes** — the 32-byte stand-in for a 64-byte account address
//!   inside transaction bodies;
//! - the final compression step of the chameleon hash itself, which turns a
//!   curve point into a 32-byte identifier.
//!
//! Keeping all three on one function means a single place to audit when the
//! network changes its digest.

use sha3::{Digest, Sha3_256};

/// SHA3-256 of `data`.
///
/// # Example
///
/// ```
/// use chameleon_protocol::crypto::sha3_256;
///
/// assert_eq!(sha3_256(b"redact me").len(), 32);
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA3-256 over several byte slices, fed in order without separators.
pub fn sha3_256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
