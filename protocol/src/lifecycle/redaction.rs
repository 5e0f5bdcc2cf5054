//! # Redaction Engine
//!
//! Replaces a staged transaction's `data` while keeping its identifier.
//!
//! ## Algorithm
//!
//! For a target hash `h` and new payload `d'`:
//!
//! 1. Load the transaction stored under `h` (`NotFound` otherwise).
//! 2. Remember its check string `r` and content hash `m`.
//! 3. Set `data = d'` and recompute the content hash `m'`.
//! 4. Ask the chameleon collaborator for `r'` with
//!    `CH(params, r', m') == CH(params, r, m) == h`.
//! 5. Store the transaction, now carrying `r'`, under `h` again.
//!
//! A delete is a redaction with an empty payload.
//!
//! ## Guards
//!
//! Before anything is mutated the engine checks that the transaction kind
//! carries a check string at all, that `params` actually reproduce `h` for
//! the stored record, and that `params` hold the trapdoor. After step 4 the
//! new hash is recomputed; if it is not `h` nothing is written.
//!
//! ## Concurrency
//!
//! Steps 1–5 are a read-modify-write on one store key. They run inside the
//! store's per-hash lock, the same one the signature coordinator takes, so
//! two redactions of the same transaction run one after the other and the
//! second one collides from the first one's result. A signature attached
//! meanwhile is either already in the loaded record or lands after the
//! redacted one is written. Redactions of different hashes do not contend.

use tracing::{debug, info, warn};

use crate::crypto::chameleon::{generate_collision, ChParams, CheckString};
use crate::error::{ClientError, ClientResult};
use crate::storage::db::TxStore;
use crate::transaction::TxHash;

/// Stateless apart from the store handle.
#[derive(Debug, Clone)]
pub struct RedactionEngine {
    store: TxStore,
}

impl RedactionEngine {
    pub fn new(store: TxStore) -> Self {
        Self { store }
    }

    /// `Redact(target, new_data)`: returns the new check string.
    pub fn redact(
        &self,
        target: &TxHash,
        new_data: Vec<u8>,
        params: &ChParams,
    ) -> ClientResult<CheckString> {
        self.store
            .locks()
            .with(target, || self.redact_locked(target, new_data, params))
    }

    fn redact_locked(
        &self,
        target: &TxHash,
        new_data: Vec<u8>,
        params: &ChParams,
    ) -> ClientResult<CheckString> {
        let mut tx = self.store.get(target)?.ok_or_else(|| {
            debug!(hash = %target, "redaction target not staged");
            ClientError::NotFound(*target)
        })?;

        let kind = tx.kind();
        let old_check_string = match (kind.is_redactable(), tx.check_string) {
            (true, Some(cs)) => cs,
            _ => {
                return Err(ClientError::invalid(&format!("{kind} cannot be redacted")));
            }
        };

        if tx.id(Some(params))? != *target {
            warn!(hash = %target, "chameleon parameters do not reproduce target hash");
            return Err(ClientError::invalid(
                "chameleon parameters do not match the transaction",
            ));
        }
        if !params.has_trapdoor() {
            return Err(ClientError::Crypto(
                "redaction requires the trapdoor key".into(),
            ));
        }

        let old_content_hash = tx.content_hash();
        tx.set_data(new_data);
        let new_content_hash = tx.content_hash();

        let new_check_string =
            generate_collision(params, &old_check_string, &old_content_hash, &new_content_hash)?;
        tx.set_check_string(new_check_string);

        let recomputed = tx.id(Some(params))?;
        if recomputed != *target {
            warn!(hash = %target, got = %recomputed, "collision did not reproduce target hash");
            return Err(ClientError::Crypto(
                "collision check string does not reproduce the hash".into(),
            ));
        }

        self.store.put(target, &tx)?;
        info!(hash = %target, kind = %kind, data_len = tx.data.len(), "transaction redacted");
        Ok(new_check_string)
    }

    /// Redact to an empty payload.
    pub fn delete(&self, target: &TxHash, params: &ChParams) -> ClientResult<CheckString> {
        self.redact(target, Vec::new(), params)
    }
}
