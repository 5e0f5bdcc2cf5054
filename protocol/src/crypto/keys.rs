//! # Key Management
//!
//! ECDSA keys on secp256k1, the curve the network verifies signatures with.
//!
//! ## Encodings
//!
//! | Material    | Fields      | Width               |
//! |-------------|-------------|---------------------|
//! | public key  | `X, Y`      | 2 x 64 hex chars    |
//! | private key | `X, Y, D`   | 3 x 64 hex chars    |
//! | address     | `X \|\| Y`  | 64 bytes / 128 hex  |
//!
//! Key files carry the same fields, one per line. A private key file is also
//! a valid public key file: readers that only want the public half take the
//! first two lines.
//!
//! ## Security considerations
//!
//! - `PrivateKey` has no `Serialize` impl and its `Debug` output never
//!   includes `D`. Writing a key out is always an explicit `to_fields()`.
//! - Key files are created with mode 0600 on Unix.
//! - Keys are read from disk on demand and never cached by this module.

use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::{EncodedPoint, FieldBytes};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::encoding::{bytes64, decode_hex_field, read_fields, write_fields};
use super::hash::sha3_256;
use crate::config::{ADDRESS_HEX_LEN, ADDRESS_LEN};
use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 64-byte account address: the uncompressed public key coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(#[serde(with = "bytes64")] pub [u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Parse the 128-character hex form.
    pub fn from_hex(s: &str) -> ClientResult<Self> {
        if s.len() != ADDRESS_HEX_LEN {
            return Err(ClientError::Validation(
                "invalid argument length: Address".into(),
            ));
        }
        Ok(Address(decode_hex_field(s, "Address")?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// SHA3-256 of the address. This is what transaction bodies carry.
    pub fn hash(&self) -> [u8; 32] {
        sha3_256(&self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}…)", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The verifying half of an account key.
#[derive(Clone)]
pub struct PublicKey {
    key: VerifyingKey,
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for PublicKey {}

impl PublicKey {
    /// Build a public key from its hex `X` and `Y` coordinates.
    pub fn from_hex_fields(x: &str, y: &str) -> ClientResult<Self> {
        let x: [u8; 32] = decode_hex_field(x, "X")?;
        let y: [u8; 32] = decode_hex_field(y, "Y")?;
        let point = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(&x),
            FieldBytes::from_slice(&y),
            false,
        );
        let key = VerifyingKey::from_encoded_point(&point)
            .map_err(|_| ClientError::Decoding("X, Y is not a point on secp256k1".into()))?;
        Ok(Self { key })
    }

    /// `AddressFromPublicKey`: the raw `X || Y` coordinates.
    pub fn address(&self) -> Address {
        // Uncompressed SEC1: 0x04 || X || Y.
        let point = self.key.to_encoded_point(false);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&point.as_bytes()[1..1 + ADDRESS_LEN]);
        Address(out)
    }

    /// Hex `X` and `Y`.
    pub fn to_fields(&self) -> [String; 2] {
        let addr = self.address();
        [hex::encode(&addr.0[..32]), hex::encode(&addr.0[32..])]
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }
}

impl From<&SigningKey> for PublicKey {
    fn from(signing_key: &SigningKey) -> Self {
        Self {
            key: *signing_key.verifying_key(),
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.address()).finish()
    }
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// A full account key. Guard it; the client only needs one for the
/// optional local signing path.
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Build a private key from hex `X`, `Y`, `D`. The coordinates must be
    /// the public key derived from `D`.
    pub fn from_hex_fields(x: &str, y: &str, d: &str) -> ClientResult<Self> {
        let expected = PublicKey::from_hex_fields(x, y)?;
        let d: [u8; 32] = decode_hex_field(d, "D")?;
        let signing_key = SigningKey::from_slice(&d)
            .map_err(|_| ClientError::Decoding("D is not a valid secp256k1 scalar".into()))?;
        if PublicKey::from(&signing_key) != expected {
            return Err(ClientError::Decoding(
                "private key does not match its public coordinates".into(),
            ));
        }
        Ok(Self { signing_key })
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(&self.signing_key)
    }

    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Hex `X`, `Y`, `D`. This is the on-disk format.
    pub fn to_fields(&self) -> [String; 3] {
        let [x, y] = self.public_key().to_fields();
        [x, y, hex::encode(self.signing_key.to_bytes())]
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Key files
// ---------------------------------------------------------------------------

/// `ExtractKeyFromFile`: read a private key file. The file must exist.
pub fn extract_key_from_file(path: &Path) -> ClientResult<PrivateKey> {
    let fields = read_fields(path)?;
    match fields.as_slice() {
        [x, y, d] => PrivateKey::from_hex_fields(x, y, d)
            .map_err(|e| ClientError::Resolution(format!("{}: {e}", path.display()))),
        _ => Err(ClientError::Resolution(format!(
            "{}: expected 3 key fields, found {}",
            path.display(),
            fields.len()
        ))),
    }
}

/// `GetOrCreateKeyFromFile`: read a private key file, generating and
/// writing a new key if the file does not exist yet.
pub fn get_or_create_key_from_file(path: &Path) -> ClientResult<PrivateKey> {
    if path.exists() {
        return extract_key_from_file(path);
    }
    let key = PrivateKey::generate();
    write_fields(path, &key.to_fields())?;
    tracing::info!(path = %path.display(), address = %key.address(), "generated new account key");
    Ok(key)
}

/// Public-key flavour of [`get_or_create_key_from_file`]. Accepts files
/// holding either `X, Y` or `X, Y, D`.
pub fn get_or_create_public_key_from_file(path: &Path) -> ClientResult<PublicKey> {
    if !path.exists() {
        return Ok(get_or_create_key_from_file(path)?.public_key());
    }
    let fields = read_fields(path)?;
    match fields.as_slice() {
        [x, y] | [x, y, _] => PublicKey::from_hex_fields(x, y)
            .map_err(|e| ClientError::Resolution(format!("{}: {e}", path.display()))),
        _ => Err(ClientError::Resolution(format!(
            "{}: expected 2 or 3 key fields, found {}",
            path.display(),
            fields.len()
        ))),
    }
}
