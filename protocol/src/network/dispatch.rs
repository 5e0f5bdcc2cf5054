//! # Submission Dispatcher
//!
//! Sends a finalized transaction to the bootstrap node. The broadcast type
//! follows from [`TxKind`], so there is no fallthrough for unknown shapes.
//!
//! Delivery is at-most-once: a failed send is logged and returned, never
//! retried here. Callers that want another attempt call `submit` again.

use std::sync::Arc;

use tracing::{info, warn};

use super::message::MessageType;
use super::transport::{Frame, Transport};
use crate::error::{ClientError, ClientResult};
use crate::transaction::{Transaction, TxHash, TxKind};

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Broadcast type `tx` would be sent as.
    pub fn message_type(kind: TxKind) -> MessageType {
        MessageType::for_kind(kind)
    }

    /// `Submit(hash, tx)`.
    pub async fn submit(&self, hash: &TxHash, tx: &Transaction) -> ClientResult<()> {
        let msg_type = Self::message_type(tx.kind());
        let payload = bincode::serialize(tx)
            .map_err(|e| ClientError::Transport(format!("encode {hash}: {e}")))?;

        match self
            .transport
            .send(&self.endpoint, Frame::new(msg_type, payload))
            .await
        {
            Ok(()) => {
                info!(hash = %hash, msg_type = %msg_type, endpoint = %self.endpoint, "transaction sent to network");
                Ok(())
            }
            Err(e) => {
                warn!(hash = %hash, msg_type = %msg_type, error = %e, "transaction submission failed");
                Err(e)
            }
        }
    }
}
