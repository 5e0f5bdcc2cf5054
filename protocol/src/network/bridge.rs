//! # Network Request Bridge
//!
//! Lets a caller `await` the answer to an account query as if it were a
//! plain function call, while the actual traffic goes through a background
//! pump task.
//!
//! ## How it works
//!
//! ```text
//!  request_account ──▶ pending[id] = oneshot ──▶ outbound queue ──▶ pump
//!        ▲                                                           │
//!        └──────────── oneshot::recv ◀── complete(id, result) ◀──────┘
//! ```
//!
//! - Every request gets a fresh id from an atomic counter. Responses are
//!   matched by id, so any number of queries can be in flight at once.
//! - The waiter gives up after the configured timeout and removes its own
//!   pending entry. A response arriving after that finds no entry and is
//!   dropped with a debug log.
//! - [`RequestBridge::shutdown`] stops the pump and wakes every waiter with
//!   [`ClientError::Cancelled`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::message::MessageType;
use super::transport::{Frame, Transport};
use crate::account::Account;
use crate::config::BRIDGE_QUEUE_CAPACITY;
use crate::error::{ClientError, ClientResult};

type Responder = oneshot::Sender<ClientResult<Option<Account>>>;
type PendingMap = DashMap<u64, Responder>;

/// Payload of an account or root-account request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRequest {
    pub request_id: u64,
    pub address_hash: [u8; 32],
}

#[derive(Debug)]
struct Outbound {
    root: bool,
    request: AccountRequest,
}

/// Request/response correlation over an async transport.
#[derive(Debug, Clone)]
pub struct RequestBridge {
    next_id: Arc<AtomicU64>,
    pending: Arc<PendingMap>,
    outbound: mpsc::Sender<Outbound>,
    timeout: Duration,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl RequestBridge {
    /// Start the pump on the current runtime and return the bridge handle.
    pub fn spawn(transport: Arc<dyn Transport>, endpoint: String, timeout: Duration) -> Self {
        let (outbound, queue) = mpsc::channel(BRIDGE_QUEUE_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let pending = Arc::new(PendingMap::new());

        tokio::spawn(pump(
            transport,
            endpoint,
            queue,
            Arc::clone(&pending),
            shutdown_rx.clone(),
        ));

        Self {
            next_id: Arc::new(AtomicU64::new(1)),
            pending,
            outbound,
            timeout,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// `RequestAccount(isRoot, addressHash)` followed by `Fetch`.
    ///
    /// `Ok(None)` means the node answered "no such account".
    pub async fn request_account(
        &self,
        root: bool,
        address_hash: [u8; 32],
    ) -> ClientResult<Option<Account>> {
        let mut shutdown = self.shutdown_rx.clone();
        if *shutdown.borrow() {
            return Err(ClientError::Cancelled);
        }

        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.insert(request_id, tx);

        let request = AccountRequest {
            request_id,
            address_hash,
        };
        if self.outbound.send(Outbound { root, request }).await.is_err() {
            self.pending.remove(&request_id);
            return Err(ClientError::Cancelled);
        }

        tokio::select! {
            res = tokio::time::timeout(self.timeout, rx) => match res {
                Ok(Ok(result)) => result,
                // Responder dropped: the pump shut down.
                Ok(Err(_)) => Err(ClientError::Cancelled),
                Err(_) => {
                    self.pending.remove(&request_id);
                    warn!(request_id, "account request timed out");
                    Err(ClientError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    })
                }
            },
            _ = shutdown.changed() => {
                self.pending.remove(&request_id);
                Err(ClientError::Cancelled)
            }
        }
    }

    /// Stop the pump and cancel every outstanding request.
    pub fn shutdown(&self) {
        // send_replace never fails, even with no live receivers.
        self.shutdown_tx.send_replace(true);
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Hand `result` to the waiter for `request_id`, if it is still waiting.
fn complete(pending: &PendingMap, request_id: u64, result: ClientResult<Option<Account>>) {
    match pending.remove(&request_id) {
        Some((_, responder)) => {
            // The waiter may have hit its timeout between remove and send.
            let _ = responder.send(result);
        }
        None => debug!(request_id, "dropping late response"),
    }
}

fn decode_reply(reply: Frame) -> ClientResult<Option<Account>> {
    match reply.msg_type {
        MessageType::AccountResponse => bincode::deserialize(&reply.payload)
            .map_err(|e| ClientError::Transport(format!("malformed account response: {e}"))),
        MessageType::NotFound => Ok(None),
        other => Err(ClientError::Transport(format!(
            "unexpected reply type {other}"
        ))),
    }
}

async fn pump(
    transport: Arc<dyn Transport>,
    endpoint: String,
    mut queue: mpsc::Receiver<Outbound>,
    pending: Arc<PendingMap>,
    mut shutdown: watch::Receiver<bool>,
) {
    debug!(endpoint = %endpoint, "request bridge pump started");
    loop {
        tokio::select! {
            next = queue.recv() => {
                let Some(Outbound { root, request }) = next else { break };
                let transport = Arc::clone(&transport);
                let endpoint = endpoint.clone();
                let pending = Arc::clone(&pending);
                tokio::spawn(async move {
                    let result = match bincode::serialize(&request) {
                        Ok(payload) => {
                            let frame = Frame::new(MessageType::account_request(root), payload);
                            match transport.request(&endpoint, frame).await {
                                Ok(reply) => decode_reply(reply),
                                Err(e) => Err(e),
                            }
                        }
                        Err(e) => Err(ClientError::Transport(e.to_string())),
                    };
                    complete(&pending, request.request_id, result);
                });
            }
            _ = shutdown.changed() => break,
        }
    }
    pending.clear();
    info!("request bridge pump stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Address;
    use async_trait::async_trait;

    /// Answers account requests for one known address hash, optionally
    /// after a delay.
    struct FakeNode {
        known: [u8; 32],
        delay: Duration,
    }

    #[async_trait]
    impl Transport for FakeNode {
        async fn send(&self, _endpoint: &str, _frame: Frame) -> ClientResult<()> {
            Ok(())
        }

        async fn request(&self, _endpoint: &str, frame: Frame) -> ClientResult<Frame> {
            tokio::time::sleep(self.delay).await;
            let req: AccountRequest = bincode::deserialize(&frame.payload).unwrap();
            if req.address_hash != self.known {
                return Ok(Frame::new(MessageType::NotFound, vec![]));
            }
            let account = Account {
                address: Address::ZERO,
                balance: 0,
                tx_count: 0,
                is_created: true,
                is_root: frame.msg_type == MessageType::RootAccountRequest,
                is_staking: false,
            };
            Ok(Frame::new(
                MessageType::AccountResponse,
                bincode::serialize(&Some(account)).unwrap(),
            ))
        }
    }

    fn bridge(delay: Duration, timeout: Duration) -> RequestBridge {
        let node = Arc::new(FakeNode {
            known: [7; 32],
            delay,
        });
        RequestBridge::spawn(node, "node:8000".into(), timeout)
    }

    #[tokio::test]
    async fn known_and_unknown_accounts() {
        let bridge = bridge(Duration::ZERO, Duration::from_secs(5));
        let acc = bridge.request_account(false, [7; 32]).await.unwrap().unwrap();
        assert!(acc.is_created);
        assert!(!acc.is_root);
        let root = bridge.request_account(true, [7; 32]).await.unwrap().unwrap();
        assert!(root.is_root);
        assert!(bridge.request_account(false, [8; 32]).await.unwrap().is_none());
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_requests_are_correlated() {
        let bridge = bridge(Duration::from_millis(10), Duration::from_secs(5));
        let (a, b) = tokio::join!(
            bridge.request_account(true, [7; 32]),
            bridge.request_account(false, [9; 32]),
        );
        assert!(a.unwrap().unwrap().is_root);
        assert!(b.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_node_times_out_and_late_reply_is_dropped() {
        let bridge = bridge(Duration::from_secs(60), Duration::from_millis(100));
        let err = bridge.request_account(false, [7; 32]).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout { timeout_ms: 100 }));
        assert_eq!(bridge.pending_count(), 0);

        // Let the late reply arrive; it must not resurrect anything.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_waiters() {
        let bridge = bridge(Duration::from_secs(3600), Duration::from_secs(7200));
        let waiter = {
            let bridge = bridge.clone();
            tokio::spawn(async move { bridge.request_account(false, [7; 32]).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        bridge.shutdown();

        let err = waiter.await.unwrap().unwrap_err();
        assert!(matches!(err, ClientError::Cancelled));
        assert!(matches!(
            bridge.request_account(false, [7; 32]).await,
            Err(ClientError::Cancelled)
        ));
    }
}
