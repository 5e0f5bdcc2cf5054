//! # Block Headers
//!
//! The client caches block headers it has seen so that an account-state
//! collaborator can replay them later. The client itself never validates or
//! orders them; it just keeps them keyed by hash, plus a pointer to the most
//! recent one.
//!
//! ## Hash Computation
//!
//! `hash = SHA3-256(height || prev_hash || timestamp || beneficiary || tx_count)`
//! with integers little-endian.

use serde::{Deserialize, Serialize};

use crate::crypto::hash::sha3_256;

/// A cached block header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: u32,
    pub hash: [u8; 32],
    /// All zeros for the genesis block.
    pub prev_hash: [u8; 32],
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Address hash of the miner that produced the block.
    pub beneficiary: [u8; 32],
    /// Number of transactions the block carries.
    pub tx_count: u32,
}

impl BlockHeader {
    /// Build a header and fill in its hash.
    pub fn new(height: u32, prev_hash: [u8; 32], timestamp: i64, beneficiary: [u8; 32], tx_count: u32) -> Self {
        let mut header = Self {
            height,
            hash: [0u8; 32],
            prev_hash,
            timestamp,
            beneficiary,
            tx_count,
        };
        header.hash = header.compute_hash();
        header
    }

    pub fn compute_hash(&self) -> [u8; 32] {
        let mut buf = Vec::with_capacity(4 + 32 + 8 + 32 + 4);
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf.extend_from_slice(&self.prev_hash);
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&self.beneficiary);
        buf.extend_from_slice(&self.tx_count.to_le_bytes());
        sha3_256(&buf)
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash == [0u8; 32]
    }
}
