//! Core type definitions for staged transactions.
//!
//! [`TxHash`] is the permanent identifier of a staged transaction and the
//! key it lives under in the store. [`TxKind`] is the explicit tag every
//! component dispatches on, in place of inspecting transaction shapes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::HASH_LEN;
use crate::crypto::encoding::decode_hex_field;
use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// TxHash
// ---------------------------------------------------------------------------

/// A 32-byte transaction identifier. For redactable kinds this is the
/// chameleon hash; for the rest it is the SHA3 content hash.
///
/// Hex-encoded (64 chars) at every textual boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxHash(pub [u8; HASH_LEN]);

impl TxHash {
    pub fn from_hex(s: &str) -> ClientResult<Self> {
        Ok(TxHash(decode_hex_field(s, "tx hash")?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.to_hex())
    }
}

impl FromStr for TxHash {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; HASH_LEN]> for TxHash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        TxHash(bytes)
    }
}

// ---------------------------------------------------------------------------
// TxKind
// ---------------------------------------------------------------------------

/// The five transaction kinds the client can stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    /// Creates a new account and registers its chameleon parameters.
    AccountCreation,
    /// Moves funds between two accounts. Supports a co-signer.
    FundsTransfer,
    /// Changes a network parameter. Root accounts only.
    Config,
    /// Toggles an account's validator status.
    Stake,
    /// Replaces the data of an earlier transaction (or deletes it).
    Update,
}

impl TxKind {
    /// Every kind, in the order the store probes namespaces.
    pub const ALL: [TxKind; 5] = [
        TxKind::AccountCreation,
        TxKind::FundsTransfer,
        TxKind::Config,
        TxKind::Stake,
        TxKind::Update,
    ];

    /// Whether transactions of this kind carry a check string and can be
    /// redacted.
    pub fn is_redactable(self) -> bool {
        matches!(
            self,
            TxKind::AccountCreation | TxKind::FundsTransfer | TxKind::Update
        )
    }

    /// Whether the second signature slot is meaningful for this kind.
    pub fn supports_cosigner(self) -> bool {
        matches!(self, TxKind::FundsTransfer)
    }

    /// Stable one-byte tag used in content hashes and the store's kind index.
    pub fn as_byte(self) -> u8 {
        match self {
            TxKind::AccountCreation => 1,
            TxKind::FundsTransfer => 2,
            TxKind::Config => 3,
            TxKind::Stake => 4,
            TxKind::Update => 5,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        TxKind::ALL.into_iter().find(|k| k.as_byte() == b)
    }

    /// Store namespace holding this kind.
    pub fn bucket(self) -> &'static str {
        match self {
            TxKind::AccountCreation => "account_transactions",
            TxKind::FundsTransfer => "fund_transactions",
            TxKind::Config => "config_transactions",
            TxKind::Stake => "staking_transactions",
            TxKind::Update => "update_transactions",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccountCreation => write!(f, "AccountTx"),
            Self::FundsTransfer => write!(f, "FundsTx"),
            Self::Config => write!(f, "ConfigTx"),
            Self::Stake => write!(f, "StakeTx"),
            Self::Update => write!(f, "UpdateTx"),
        }
    }
}
