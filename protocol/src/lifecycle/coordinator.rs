//! # Signature Coordinator
//!
//! Second half of the prepare → sign → submit protocol. The caller comes
//! back with the hash it was given and the signature bytes it produced;
//! the coordinator finds the staged record, writes the slots, rewrites the
//! record under the same hash, and hands it to the dispatcher.
//!
//! Both signing paths rewrite the record inside the store's per-hash lock,
//! shared with the redaction engine.
//!
//! Signatures are not verified here. The network checks them when the
//! transaction reaches consensus.

use tracing::{debug, info};

use crate::crypto::keys::PrivateKey;
use crate::crypto::signatures::Signature;
use crate::error::{ClientError, ClientResult};
use crate::network::dispatch::Dispatcher;
use crate::storage::db::TxStore;
use crate::transaction::{attach_signatures, sign_transaction, Transaction, TxHash};

#[derive(Debug, Clone)]
pub struct SignatureCoordinator {
    store: TxStore,
    dispatcher: Dispatcher,
}

impl SignatureCoordinator {
    pub fn new(store: TxStore, dispatcher: Dispatcher) -> Self {
        Self { store, dispatcher }
    }

    fn load(&self, hash: &TxHash) -> ClientResult<Transaction> {
        self.store.get(hash)?.ok_or_else(|| {
            debug!(hash = %hash, "signature for unknown transaction");
            ClientError::NotFound(*hash)
        })
    }

    /// `AttachSignature(hash, sig)`. Stores and returns the signed record.
    pub fn attach_signature(
        &self,
        hash: &TxHash,
        primary: Signature,
        cosigner: Option<Signature>,
    ) -> ClientResult<Transaction> {
        let tx = self.store.locks().with(hash, || {
            let mut tx = self.load(hash)?;
            attach_signatures(&mut tx, primary, cosigner)?;
            self.store.put(hash, &tx)?;
            Ok::<_, ClientError>(tx)
        })?;
        info!(hash = %hash, kind = %tx.kind(), cosigned = cosigner.is_some(), "signature attached");
        Ok(tx)
    }

    /// Sign the staged record with keys held by this process. Used by the
    /// CLI when it is given a private key directly.
    pub fn sign_locally(
        &self,
        hash: &TxHash,
        key: &PrivateKey,
        cosigner_key: Option<&PrivateKey>,
    ) -> ClientResult<Transaction> {
        let tx = self.store.locks().with(hash, || {
            let mut tx = self.load(hash)?;
            sign_transaction(hash, &mut tx, key, cosigner_key)?;
            self.store.put(hash, &tx)?;
            Ok::<_, ClientError>(tx)
        })?;
        info!(hash = %hash, kind = %tx.kind(), "transaction signed locally");
        Ok(tx)
    }

    /// Send the staged record under `hash` as it is now.
    pub async fn submit(&self, hash: &TxHash) -> ClientResult<Transaction> {
        let tx = self.load(hash)?;
        if !tx.is_signed() {
            return Err(ClientError::invalid("transaction is not signed"));
        }
        self.dispatcher.submit(hash, &tx).await?;
        Ok(tx)
    }

    /// Attach, then submit.
    pub async fn attach_and_submit(
        &self,
        hash: &TxHash,
        primary: Signature,
        cosigner: Option<Signature>,
    ) -> ClientResult<Transaction> {
        let tx = self.attach_signature(hash, primary, cosigner)?;
        self.dispatcher.submit(hash, &tx).await?;
        Ok(tx)
    }
}
