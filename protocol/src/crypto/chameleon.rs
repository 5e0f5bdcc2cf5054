//! # Chameleon Hash over BN254
//!
//! A discrete-log chameleon hash: anyone holding the public parameters can
//! compute it, but only the holder of the trapdoor `tk` can find a second
//! preimage. That second preimage is how a transaction's payload changes
//! while its identifier stays put.
//!
//! ```text
//! params:   g ∈ G1,  tk ∈ Fr,  hk = tk · g
//! hash:     CH(m, r) = SHA3-256( compress( m · g + r · hk ) )
//! collide:  r' = r + (m - m') · tk⁻¹    ⇒    m'·g + r'·hk = m·g + r·hk
//! ```
//!
//! `m` is a transaction's SHA3 content hash reduced into `Fr`, and `r` is
//! the transaction's *check string*. Redaction swaps `(m, r)` for
//! `(m', r')`; the curve point, and therefore the 32-byte identifier, does
//! not move.
//!
//! ## Parameter encoding
//!
//! Five 32-byte fields, hex-encoded at 64 characters each:
//!
//! | Field | Meaning                                   |
//! |-------|-------------------------------------------|
//! | `g`   | generator, compressed G1 point            |
//! | `p`   | base-field modulus (big-endian)           |
//! | `q`   | group order / scalar modulus (big-endian) |
//! | `hk`  | public hash key, compressed G1 point      |
//! | `tk`  | trapdoor scalar, optional                 |
//!
//! `p` and `q` pin the curve: parameters minted for any other group are
//! rejected at decode time instead of producing garbage hashes.
//!
//! The trapdoor must never leave the client. [`ChParams::sanitized`] strips
//! it, and account-creation transactions only ever embed sanitized params.

use ark_bn254::{Fq, Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, Field, PrimeField, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use std::path::Path;

use super::encoding::{decode_hex_field, read_fields, write_fields};
use super::hash::sha3_256;
use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Chameleon-hash domain parameters, with or without the trapdoor.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChParams {
    pub g: [u8; 32],
    pub p: [u8; 32],
    pub q: [u8; 32],
    pub hk: [u8; 32],
    pub tk: Option<[u8; 32]>,
}

/// The per-transaction randomness `r`. Replaced on every redaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckString {
    pub r: [u8; 32],
}

/// Parameters decoded into curve objects.
struct Decoded {
    g: G1Affine,
    hk: G1Affine,
    tk: Option<Fr>,
}

// ---------------------------------------------------------------------------
// Field/point helpers
// ---------------------------------------------------------------------------

fn modulus_be<F: PrimeField>() -> [u8; 32] {
    let bytes = F::MODULUS.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

fn point_to_bytes(point: &G1Affine) -> ClientResult<[u8; 32]> {
    let mut buf = Vec::with_capacity(32);
    point
        .serialize_compressed(&mut buf)
        .map_err(|e| ClientError::Crypto(format!("point serialization: {e}")))?;
    buf.try_into()
        .map_err(|_| ClientError::Crypto("compressed G1 point is not 32 bytes".into()))
}

fn point_from_bytes(bytes: &[u8; 32], name: &str) -> ClientResult<G1Affine> {
    G1Affine::deserialize_compressed(&bytes[..])
        .map_err(|e| ClientError::Decoding(format!("{name}: not a BN254 G1 point ({e})")))
}

fn scalar_to_bytes(scalar: &Fr) -> ClientResult<[u8; 32]> {
    let mut buf = Vec::with_capacity(32);
    scalar
        .serialize_compressed(&mut buf)
        .map_err(|e| ClientError::Crypto(format!("scalar serialization: {e}")))?;
    buf.try_into()
        .map_err(|_| ClientError::Crypto("scalar is not 32 bytes".into()))
}

fn scalar_from_bytes(bytes: &[u8; 32], name: &str) -> ClientResult<Fr> {
    Fr::deserialize_compressed(&bytes[..])
        .map_err(|e| ClientError::Decoding(format!("{name}: not a BN254 scalar ({e})")))
}

/// Map a 32-byte content hash to the message scalar `m`.
fn message_scalar(content_hash: &[u8; 32]) -> Fr {
    Fr::from_be_bytes_mod_order(content_hash)
}

// ---------------------------------------------------------------------------
// ChParams
// ---------------------------------------------------------------------------

impl ChParams {
    /// Generate fresh parameters, trapdoor included.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> ClientResult<Self> {
        let tk = loop {
            let t = Fr::rand(rng);
            if !t.is_zero() {
                break t;
            }
        };
        let g = loop {
            let candidate = G1Projective::rand(rng).into_affine();
            if !candidate.is_zero() {
                break candidate;
            }
        };
        let hk = g.mul(tk).into_affine();

        Ok(Self {
            g: point_to_bytes(&g)?,
            p: modulus_be::<Fq>(),
            q: modulus_be::<Fr>(),
            hk: point_to_bytes(&hk)?,
            tk: Some(scalar_to_bytes(&tk)?),
        })
    }

    /// Parse 4 (`g, p, q, hk`) or 5 (`.., tk`) hex fields.
    pub fn from_hex_fields(fields: &[&str]) -> ClientResult<Self> {
        if fields.len() != 4 && fields.len() != 5 {
            return Err(ClientError::Decoding(format!(
                "chameleon parameters need 4 or 5 fields, got {}",
                fields.len()
            )));
        }
        let params = Self {
            g: decode_hex_field(fields[0], "g")?,
            p: decode_hex_field(fields[1], "p")?,
            q: decode_hex_field(fields[2], "q")?,
            hk: decode_hex_field(fields[3], "hk")?,
            tk: match fields.get(4) {
                Some(tk) => Some(decode_hex_field(tk, "tk")?),
                None => None,
            },
        };
        params.decode()?;
        Ok(params)
    }

    /// Hex fields in file order. Includes `tk` when present.
    pub fn to_fields(&self) -> Vec<String> {
        let mut fields = vec![
            hex::encode(self.g),
            hex::encode(self.p),
            hex::encode(self.q),
            hex::encode(self.hk),
        ];
        if let Some(tk) = self.tk {
            fields.push(hex::encode(tk));
        }
        fields
    }

    /// A copy without the trapdoor, safe to put on the wire.
    pub fn sanitized(&self) -> Self {
        Self {
            tk: None,
            ..self.clone()
        }
    }

    pub fn has_trapdoor(&self) -> bool {
        self.tk.is_some()
    }

    /// The public part of the parameters, in canonical byte order. Feeds
    /// content hashes of transactions that embed parameters.
    pub fn public_bytes(&self) -> [u8; 128] {
        let mut out = [0u8; 128];
        out[..32].copy_from_slice(&self.g);
        out[32..64].copy_from_slice(&self.p);
        out[64..96].copy_from_slice(&self.q);
        out[96..].copy_from_slice(&self.hk);
        out
    }

    fn decode(&self) -> ClientResult<Decoded> {
        if self.p != modulus_be::<Fq>() {
            return Err(ClientError::Decoding(
                "p does not match the BN254 base field".into(),
            ));
        }
        if self.q != modulus_be::<Fr>() {
            return Err(ClientError::Decoding(
                "q does not match the BN254 group order".into(),
            ));
        }
        let g = point_from_bytes(&self.g, "g")?;
        if g.is_zero() {
            return Err(ClientError::Decoding("g is the identity".into()));
        }
        let hk = point_from_bytes(&self.hk, "hk")?;
        let tk = match &self.tk {
            Some(bytes) => {
                let tk = scalar_from_bytes(bytes, "tk")?;
                if g.mul(tk).into_affine() != hk {
                    return Err(ClientError::Decoding(
                        "tk is not the trapdoor for hk".into(),
                    ));
                }
                Some(tk)
            }
            None => None,
        };
        Ok(Decoded { g, hk, tk })
    }
}

impl fmt::Debug for ChParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChParams")
            .field("hk", &hex::encode(&self.hk[..8]))
            .field("trapdoor", &self.tk.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// CheckString
// ---------------------------------------------------------------------------

impl CheckString {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> ClientResult<Self> {
        Ok(Self {
            r: scalar_to_bytes(&Fr::rand(rng))?,
        })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.r)
    }

    pub fn from_hex(s: &str) -> ClientResult<Self> {
        let r = decode_hex_field(s, "check string")?;
        scalar_from_bytes(&r, "check string")?;
        Ok(Self { r })
    }
}

impl fmt::Debug for CheckString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CheckString({}…)", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Hash / Collide
// ---------------------------------------------------------------------------

/// `NewCheckString`: fresh randomness for a new transaction.
pub fn new_check_string(params: &ChParams) -> ClientResult<CheckString> {
    params.decode()?;
    CheckString::random(&mut rand::thread_rng())
}

/// `ChameleonHash(params, checkString, contentHash)`.
pub fn chameleon_hash(
    params: &ChParams,
    check_string: &CheckString,
    content_hash: &[u8; 32],
) -> ClientResult<[u8; 32]> {
    let decoded = params.decode()?;
    let r = scalar_from_bytes(&check_string.r, "check string")?;
    let m = message_scalar(content_hash);
    let point = (decoded.g.mul(m) + decoded.hk.mul(r)).into_affine();
    Ok(sha3_256(&point_to_bytes(&point)?))
}

/// `GenerateCollision`: the check string that makes `new_hash` hash to the
/// same value `old_hash` did under `old_check_string`. Needs the trapdoor.
pub fn generate_collision(
    params: &ChParams,
    old_check_string: &CheckString,
    old_hash: &[u8; 32],
    new_hash: &[u8; 32],
) -> ClientResult<CheckString> {
    let decoded = params.decode()?;
    let tk = decoded.tk.ok_or_else(|| {
        ClientError::Crypto("chameleon parameters carry no trapdoor key".into())
    })?;
    let tk_inv = tk
        .inverse()
        .ok_or_else(|| ClientError::Crypto("trapdoor key is not invertible".into()))?;

    let r = scalar_from_bytes(&old_check_string.r, "check string")?;
    let r_new = r + (message_scalar(old_hash) - message_scalar(new_hash)) * tk_inv;

    Ok(CheckString {
        r: scalar_to_bytes(&r_new)?,
    })
}

// ---------------------------------------------------------------------------
// Parameter files
// ---------------------------------------------------------------------------

/// Read a parameter file (4 or 5 lines).
pub fn read_params_file(path: &Path) -> ClientResult<ChParams> {
    let fields = read_fields(path)?;
    let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
    ChParams::from_hex_fields(&refs)
        .map_err(|e| ClientError::Resolution(format!("{}: {e}", path.display())))
}

/// `GetOrCreateParametersFromFile`: read parameters, or generate and write
/// a full set (with trapdoor) when the file does not exist.
pub fn get_or_create_params_from_file(path: &Path) -> ClientResult<ChParams> {
    if path.exists() {
        return read_params_file(path);
    }
    let params = ChParams::generate(&mut rand::thread_rng())?;
    write_fields(path, &params.to_fields())?;
    tracing::info!(path = %path.display(), "generated new chameleon hash parameters");
    Ok(params)
}
