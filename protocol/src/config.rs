//! # Client Configuration & Constants
//!
//! Every magic number the client relies on lives here, next to the
//! [`ClientConfig`] object that carries the per-deployment knobs.
//!
//! There is no global configuration. `ClientConfig` is built once by the
//! binary (defaults, then an optional TOML file, then CLI overrides) and
//! handed to each component's constructor.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// Encoding Widths
// ---------------------------------------------------------------------------

/// Width, in hex characters, of one key coordinate (`X`, `Y` or `D`).
pub const KEY_FIELD_HEX_LEN: usize = 64;

/// Width, in hex characters, of one chameleon-hash parameter field
/// (`g`, `p`, `q`, `hk`, `tk`).
pub const CH_PARAM_HEX_LEN: usize = 64;

/// Raw size of an account address (`X || Y`).
pub const ADDRESS_LEN: usize = 64;

/// Textual account addresses are the hex encoding of [`ADDRESS_LEN`] bytes.
pub const ADDRESS_HEX_LEN: usize = ADDRESS_LEN * 2;

/// Size of every hash the client deals in: content hashes, chameleon
/// hashes, address hashes.
pub const HASH_LEN: usize = 32;

/// Size of one signature slot (`r || s`).
pub const SIGNATURE_LEN: usize = 64;

/// Substring that marks a key or parameter argument as a file reference
/// rather than an inline encoding.
pub const KEY_FILE_MARKER: &str = ".txt";

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

/// Smallest fee the network accepts. The boundary layer coerces a fee of
/// zero up to this value; the core rejects zero outright.
pub const MIN_FEE: u64 = 1;

// ---------------------------------------------------------------------------
// Network Message Types
// ---------------------------------------------------------------------------

pub const MSG_ACC_TX_BROADCAST: u8 = 1;
pub const MSG_FUNDS_TX_BROADCAST: u8 = 2;
pub const MSG_CONFIG_TX_BROADCAST: u8 = 3;
pub const MSG_STAKE_TX_BROADCAST: u8 = 4;
pub const MSG_UPDATE_TX_BROADCAST: u8 = 5;

pub const MSG_ACCOUNT_REQUEST: u8 = 30;
pub const MSG_ROOT_ACCOUNT_REQUEST: u8 = 31;
pub const MSG_ACCOUNT_RESPONSE: u8 = 40;

/// Sentinel for "no such message type". Unknown wire codes decode to this.
pub const MSG_NOT_FOUND: u8 = 110;

/// Upper bound on a single wire frame. Anything larger is rejected before
/// the payload is read.
pub const MAX_FRAME_LEN: u32 = 4 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_BOOTSTRAP_ENDPOINT: &str = "127.0.0.1:8000";
pub const DEFAULT_REST_PORT: u16 = 8010;
pub const DEFAULT_DB_PATH: &str = "client.db";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Queue depth between the request bridge and its network pump.
pub const BRIDGE_QUEUE_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for one client process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `host:port` of the node that receives broadcasts and account queries.
    pub bootstrap_endpoint: String,
    /// Port the REST front end binds to.
    pub rest_port: u16,
    /// Directory of the sled database holding staged transactions.
    pub db_path: PathBuf,
    /// How long an account query may wait for its response.
    pub request_timeout_ms: u64,
    /// How long to wait for a TCP connection to the bootstrap node.
    pub connect_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bootstrap_endpoint: DEFAULT_BOOTSTRAP_ENDPOINT.to_string(),
            rest_port: DEFAULT_REST_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ClientResult<Self> {
        toml::from_str(s).map_err(|e| ClientError::Resolution(format!("invalid config: {e}")))
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Resolution(format!("cannot read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
