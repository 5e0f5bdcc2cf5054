//! Error taxonomy for the transaction lifecycle.
//!
//! Every fallible operation in the crate returns a [`ClientError`]. The
//! variants follow the failure classes callers are expected to tell apart:
//! bad input is rejected before any state changes, missing hashes are never
//! swallowed, and crypto or transport failures are propagated without retry.

use thiserror::Error;

use crate::storage::db::DbError;
use crate::transaction::types::TxHash;

/// Errors surfaced by the lifecycle components.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or out-of-range arguments. Raised before any mutation.
    #[error("{0}")]
    Validation(String),

    /// A direct key or parameter encoding had the wrong field count, width,
    /// or content.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// A key or parameter file was missing, unreadable, or malformed.
    #[error("resolution error: {0}")]
    Resolution(String),

    /// No staged transaction exists under this hash.
    #[error("transaction not found: {0}")]
    NotFound(TxHash),

    /// Signing or collision generation failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Broadcast or query send failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A bridged request got no response in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// A bridged request was abandoned because the bridge shut down.
    #[error("request cancelled")]
    Cancelled,

    /// The persistent store failed.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl ClientError {
    /// `argument missing: <name>`
    pub fn missing(name: &str) -> Self {
        ClientError::Validation(format!("argument missing: {name}"))
    }

    /// `invalid argument: <reason>`
    pub fn invalid(reason: &str) -> Self {
        ClientError::Validation(format!("invalid argument: {reason}"))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
