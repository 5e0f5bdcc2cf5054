//! # Cryptographic Collaborators
//!
//! Everything the lifecycle needs from cryptography, behind plain functions:
//!
//! - **chameleon** — trapdoor hash, check strings, collision generation, and
//!   parameter files. This is the redaction primitive.
//! - **keys** — secp256k1 keys, addresses, key files.
//! - **signatures** — 64-byte `r || s` signatures over transaction hashes.
//! - **hash** — SHA3-256, the one ordinary digest in play.
//!
//! All of it wraps audited implementations (`k256`, arkworks, `sha3`).
//! The only arithmetic done here is the collision formula itself.

pub mod chameleon;
pub mod encoding;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use chameleon::{chameleon_hash, generate_collision, new_check_string, ChParams, CheckString};
pub use hash::sha3_256;
pub use keys::{Address, PrivateKey, PublicKey};
pub use signatures::{sign_hash, verify_hash, Signature};
