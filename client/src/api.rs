//! # REST API
//!
//! Builds the axum router for the client's HTTP front end. Every handler
//! drives the same lifecycle components as the CLI: the preparer stages a
//! transaction and hands back its hash, the caller signs that hash with
//! whatever custody it uses, and `POST /tx/signature` attaches the bytes and
//! submits.
//!
//! ## Endpoints
//!
//! | Method | Path               | Description                                 |
//! |--------|--------------------|---------------------------------------------|
//! | POST   | `/tx/acc`          | Stage an account creation (new or existing) |
//! | POST   | `/tx/funds`        | Stage a funds transfer                      |
//! | POST   | `/tx/config`       | Stage a network configuration change        |
//! | POST   | `/tx/stake`        | Stage a staking toggle                      |
//! | POST   | `/tx/update`       | Redact a transaction and stage the update   |
//! | POST   | `/tx/delete`       | Redact a transaction to empty data          |
//! | POST   | `/tx/signature`    | Attach a signature and submit               |
//! | GET    | `/tx/:hash`        | Inspect a staged transaction                |
//! | GET    | `/account/:address`| Account as the network reports it           |
//! | GET    | `/health`          | Liveness probe                              |
//! | GET    | `/metrics`         | Prometheus metrics                          |
//!
//! ## Envelope
//!
//! Every JSON response (errors included) has the same shape:
//!
//! ```json
//! { "code": 200, "message": "...", "content": [ { "name": "...", "detail": "..." } ] }
//! ```

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use chameleon_protocol::account::{AccountService, AccountView};
use chameleon_protocol::crypto::keys::Address;
use chameleon_protocol::crypto::signatures::Signature;
use chameleon_protocol::lifecycle::{Prepared, SignatureCoordinator, TxPreparer};
use chameleon_protocol::resolver::args::{
    AddAccountArgs, CreateAccountArgs, DeleteArgs, FundsArgs, NetworkArgs, StakingArgs,
    UpdateArgs,
};
use chameleon_protocol::storage::TxStore;
use chameleon_protocol::transaction::{Transaction, TxHash};
use chameleon_protocol::{ClientError, ClientResult};

use crate::fee::coerce_fee;
use crate::metrics::{metrics_handler, ClientMetrics};

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared state for all handlers. Every component is a cheap handle over
/// shared internals, so cloning per request is fine.
#[derive(Clone)]
pub struct AppState {
    /// Crate version reported by `/health`.
    pub version: String,
    pub store: TxStore,
    pub preparer: TxPreparer,
    pub coordinator: SignatureCoordinator,
    pub accounts: AccountService,
    pub metrics: ClientMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/tx/acc", post(account_tx_handler))
        .route("/tx/funds", post(funds_tx_handler))
        .route("/tx/config", post(config_tx_handler))
        .route("/tx/stake", post(stake_tx_handler))
        .route("/tx/update", post(update_tx_handler))
        .route("/tx/delete", post(delete_tx_handler))
        .route("/tx/signature", post(signature_handler))
        .route("/tx/:hash", get(transaction_handler))
        .route("/account/:address", get(account_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One named value in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub name: String,
    pub detail: String,
}

impl Content {
    fn new(name: impl Into<String>, detail: impl ToString) -> Self {
        Self {
            name: name.into(),
            detail: detail.to_string(),
        }
    }
}

/// The response body of every endpoint except `/metrics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonResponse {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub content: Vec<Content>,
}

fn respond(status: StatusCode, message: impl Into<String>, content: Vec<Content>) -> Response {
    let body = JsonResponse {
        code: status.as_u16(),
        message: message.into(),
        content,
    };
    (status, Json(body)).into_response()
}

/// HTTP status for a lifecycle error.
pub fn status_for(err: &ClientError) -> StatusCode {
    match err {
        ClientError::Validation(_) | ClientError::Decoding(_) | ClientError::Resolution(_) => {
            StatusCode::BAD_REQUEST
        }
        ClientError::NotFound(_) => StatusCode::NOT_FOUND,
        ClientError::Transport(_) => StatusCode::BAD_GATEWAY,
        ClientError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        ClientError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        ClientError::Crypto(_) | ClientError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ClientError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        warn!(error = %err, "request failed");
    }
    respond(status, err.to_string(), Vec::new())
}

fn rejection_response(rejection: JsonRejection) -> Response {
    respond(StatusCode::BAD_REQUEST, rejection.body_text(), Vec::new())
}

fn prepared_response(state: &AppState, prepared: &Prepared) -> Response {
    let kind = prepared.tx.kind();
    let label = kind.to_string();
    state
        .metrics
        .prepared_total
        .with_label_values(&[label.as_str()])
        .inc();
    respond(
        StatusCode::OK,
        format!("{kind} successfully created. Sign the provided hash."),
        vec![Content::new("Transaction", prepared.hash)],
    )
}

fn staged(state: &AppState, result: ClientResult<Prepared>) -> Response {
    match result {
        Ok(prepared) => prepared_response(state, &prepared),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn health_handler(State(state): State<AppState>) -> Response {
    respond(
        StatusCode::OK,
        "ok",
        vec![
            Content::new("Version", &state.version),
            Content::new("StagedTransactions", state.store.transaction_count()),
            Content::new("Time", chrono::Utc::now().to_rfc3339()),
        ],
    )
}

// ---------------------------------------------------------------------------
// Preparation
// ---------------------------------------------------------------------------

/// Body of `POST /tx/acc`. With `address` set, an existing address is
/// registered; otherwise the key pair in `wallet` is used (and generated
/// if the wallet file does not exist yet).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountTxRequest {
    pub header: u8,
    pub fee: u64,
    pub root_wallet: String,
    pub wallet: String,
    pub address: String,
    pub chparams: String,
    pub data: String,
}

async fn account_tx_handler(
    State(state): State<AppState>,
    payload: Result<Json<AccountTxRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(r) => return rejection_response(r),
    };

    let result = if req.address.is_empty() {
        state.preparer.prepare_account(&CreateAccountArgs {
            header: req.header,
            fee: coerce_fee(req.fee),
            root_wallet: req.root_wallet,
            wallet: req.wallet,
            chparams: req.chparams,
            data: req.data,
        })
    } else {
        state.preparer.prepare_add_account(&AddAccountArgs {
            header: req.header,
            fee: coerce_fee(req.fee),
            root_wallet: req.root_wallet,
            address: req.address,
            chparams: req.chparams,
            data: req.data,
        })
    };
    staged(&state, result)
}

async fn funds_tx_handler(
    State(state): State<AppState>,
    payload: Result<Json<FundsArgs>, JsonRejection>,
) -> Response {
    let Json(mut args) = match payload {
        Ok(p) => p,
        Err(r) => return rejection_response(r),
    };
    args.fee = coerce_fee(args.fee);
    staged(&state, state.preparer.prepare_funds(&args))
}

async fn config_tx_handler(
    State(state): State<AppState>,
    payload: Result<Json<NetworkArgs>, JsonRejection>,
) -> Response {
    let Json(mut args) = match payload {
        Ok(p) => p,
        Err(r) => return rejection_response(r),
    };
    args.fee = coerce_fee(args.fee);
    staged(&state, state.preparer.prepare_config(&args))
}

async fn stake_tx_handler(
    State(state): State<AppState>,
    payload: Result<Json<StakingArgs>, JsonRejection>,
) -> Response {
    let Json(mut args) = match payload {
        Ok(p) => p,
        Err(r) => return rejection_response(r),
    };
    args.fee = coerce_fee(args.fee);
    staged(&state, state.preparer.prepare_stake(&args))
}

// ---------------------------------------------------------------------------
// Redaction
// ---------------------------------------------------------------------------

/// Runs a redacting preparation on the blocking pool, times it, and counts
/// it when it succeeds. Collision generation, the per-hash lock and the
/// store flush all block.
async fn redacting(
    state: &AppState,
    run: impl FnOnce(TxPreparer) -> ClientResult<Prepared> + Send + 'static,
) -> Response {
    let preparer = state.preparer.clone();
    let started = Instant::now();
    let result = match tokio::task::spawn_blocking(move || run(preparer)).await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "redaction task failed");
            return respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                "redaction task failed",
                Vec::new(),
            );
        }
    };
    state
        .metrics
        .redaction_seconds
        .observe(started.elapsed().as_secs_f64());
    if result.is_ok() {
        state.metrics.redacted_total.inc();
    }
    staged(state, result)
}

async fn update_tx_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpdateArgs>, JsonRejection>,
) -> Response {
    let Json(mut args) = match payload {
        Ok(p) => p,
        Err(r) => return rejection_response(r),
    };
    args.fee = coerce_fee(args.fee);
    redacting(&state, move |preparer| preparer.prepare_update(&args)).await
}

async fn delete_tx_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeleteArgs>, JsonRejection>,
) -> Response {
    let Json(mut args) = match payload {
        Ok(p) => p,
        Err(r) => return rejection_response(r),
    };
    args.fee = coerce_fee(args.fee);
    redacting(&state, move |preparer| preparer.prepare_delete(&args)).await
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Body of `POST /tx/signature`. Hex strings throughout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignatureRequest {
    pub hash: String,
    pub signature: String,
    /// Co-signer signature, funds transfers only.
    pub cosignature: Option<String>,
}

impl SignatureRequest {
    fn decode(&self) -> ClientResult<(TxHash, Signature, Option<Signature>)> {
        if self.hash.is_empty() {
            return Err(ClientError::missing("hash"));
        }
        if self.signature.is_empty() {
            return Err(ClientError::missing("signature"));
        }
        let hash = TxHash::from_hex(self.hash.trim())?;
        let primary = Signature::from_hex(self.signature.trim())?;
        let cosigner = match self.cosignature.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(Signature::from_hex(s)?),
            _ => None,
        };
        Ok((hash, primary, cosigner))
    }
}

async fn signature_handler(
    State(state): State<AppState>,
    payload: Result<Json<SignatureRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(r) => return rejection_response(r),
    };
    let (hash, primary, cosigner) = match req.decode() {
        Ok(decoded) => decoded,
        Err(e) => return error_response(e),
    };

    match state
        .coordinator
        .attach_and_submit(&hash, primary, cosigner)
        .await
    {
        Ok(tx) => {
            state.metrics.submitted_total.inc();
            info!(hash = %hash, kind = %tx.kind(), "transaction sent");
            respond(
                StatusCode::OK,
                "Tx successfully sent to network.",
                vec![Content::new("Transaction", hash)],
            )
        }
        Err(e) => {
            if matches!(e, ClientError::Transport(_)) {
                state.metrics.submission_failures_total.inc();
            }
            error_response(e)
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

fn transaction_content(hash: &TxHash, tx: &Transaction) -> Vec<Content> {
    let mut content = vec![
        Content::new("Transaction", hash),
        Content::new("Kind", tx.kind()),
        Content::new("Header", tx.header),
        Content::new("Fee", tx.fee),
        Content::new("Data", hex::encode(&tx.data)),
    ];
    if let Some(cs) = &tx.check_string {
        content.push(Content::new("CheckString", cs.to_hex()));
    }
    content.push(Content::new("Signed", tx.is_signed()));
    if !tx.sig2.is_empty() {
        content.push(Content::new("Cosigned", true));
    }
    content
}

async fn transaction_handler(State(state): State<AppState>, Path(hash): Path<String>) -> Response {
    let lookup = TxHash::from_hex(hash.trim()).and_then(|h| {
        state
            .store
            .get(&h)?
            .map(|tx| (h, tx))
            .ok_or(ClientError::NotFound(h))
    });
    match lookup {
        Ok((h, tx)) => respond(StatusCode::OK, "Transaction found.", transaction_content(&h, &tx)),
        Err(e) => error_response(e),
    }
}

fn account_content(view: &AccountView) -> Vec<Content> {
    let acc = &view.account;
    let mut content = vec![
        Content::new("Address", acc.address),
        Content::new("Balance", acc.balance),
        Content::new("TxCount", acc.tx_count),
        Content::new("IsRoot", acc.is_root),
        Content::new("IsStaking", acc.is_staking),
    ];
    content.extend(view.recent_txs.iter().map(|h| Content::new("Tx", h)));
    content
}

async fn account_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Response {
    let address = match Address::from_hex(address.trim()) {
        Ok(a) => a,
        Err(e) => return error_response(e),
    };
    match state.accounts.get_account(&address).await {
        Ok(Some(view)) => respond(StatusCode::OK, "Account found.", account_content(&view)),
        Ok(None) => respond(StatusCode::NOT_FOUND, "Account does not exist.", Vec::new()),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use parking_lot::Mutex;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use chameleon_protocol::account::Account;
    use chameleon_protocol::crypto::keys::PrivateKey;
    use chameleon_protocol::crypto::signatures::sign_hash;
    use chameleon_protocol::lifecycle::RedactionEngine;
    use chameleon_protocol::network::{
        AccountRequest, Dispatcher, Frame, MessageType, RequestBridge, Transport,
    };

    /// Records broadcasts; knows a single account.
    struct FakeNode {
        known: [u8; 32],
        sent: Mutex<Vec<Frame>>,
        fail_sends: bool,
    }

    #[async_trait]
    impl Transport for FakeNode {
        async fn send(&self, _: &str, frame: Frame) -> ClientResult<()> {
            if self.fail_sends {
                return Err(ClientError::Transport("connection refused".into()));
            }
            self.sent.lock().push(frame);
            Ok(())
        }

        async fn request(&self, _: &str, frame: Frame) -> ClientResult<Frame> {
            let req: AccountRequest = bincode::deserialize(&frame.payload).unwrap();
            if req.address_hash != self.known || frame.msg_type == MessageType::RootAccountRequest
            {
                return Ok(Frame::new(MessageType::NotFound, vec![]));
            }
            let account = Account {
                address: Address::ZERO,
                balance: 75,
                tx_count: 3,
                is_created: true,
                is_root: false,
                is_staking: false,
            };
            Ok(Frame::new(
                MessageType::AccountResponse,
                bincode::serialize(&Some(account)).unwrap(),
            ))
        }
    }

    struct Harness {
        _dir: TempDir,
        router: Router,
        state: AppState,
        node: Arc<FakeNode>,
        sender: PrivateKey,
        known: Address,
        params_file: String,
    }

    fn harness_with(fail_sends: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = TxStore::open_temporary().unwrap();
        let known = PrivateKey::generate().address();
        let node = Arc::new(FakeNode {
            known: known.hash(),
            sent: Mutex::new(Vec::new()),
            fail_sends,
        });

        let redaction = RedactionEngine::new(store.clone());
        let state = AppState {
            version: "test".into(),
            store: store.clone(),
            preparer: TxPreparer::new(store.clone(), redaction),
            coordinator: SignatureCoordinator::new(
                store.clone(),
                Dispatcher::new(node.clone(), "node:8000"),
            ),
            accounts: AccountService::new(RequestBridge::spawn(
                node.clone(),
                "node:8000".into(),
                Duration::from_secs(5),
            )),
            metrics: ClientMetrics::new().unwrap(),
        };

        Harness {
            params_file: dir.path().join("chparams.txt").to_string_lossy().into_owned(),
            _dir: dir,
            router: create_router(state.clone()),
            state,
            node,
            sender: PrivateKey::generate(),
            known,
        }
    }

    fn harness() -> Harness {
        harness_with(false)
    }

    /// Sends a GET request and returns the (status, envelope).
    async fn get(router: &Router, path: &str) -> (StatusCode, JsonResponse) {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// Sends a POST request with a raw body and returns the (status, envelope).
    async fn post_raw(router: &Router, path: &str, body: Vec<u8>) -> (StatusCode, JsonResponse) {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_json(
        router: &Router,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, JsonResponse) {
        post_raw(router, path, serde_json::to_vec(&body).unwrap()).await
    }

    fn funds_body(h: &Harness, fee: u64) -> serde_json::Value {
        serde_json::json!({
            "from": h.sender.to_fields().join(" "),
            "to_address": PrivateKey::generate().address().to_hex(),
            "chparams": h.params_file,
            "amount": 10,
            "fee": fee,
            "data": "rent",
        })
    }

    fn hash_of(resp: &JsonResponse) -> TxHash {
        let detail = &resp
            .content
            .iter()
            .find(|c| c.name == "Transaction")
            .expect("hash in response")
            .detail;
        TxHash::from_hex(detail).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version() {
        let h = harness();
        let (status, body) = get(&h.router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.code, 200);
        assert_eq!(body.content[0], Content::new("Version", "test"));
    }

    #[tokio::test]
    async fn zero_fee_is_staged_with_minimum() {
        let h = harness();
        let (status, body) = post_json(&h.router, "/tx/funds", funds_body(&h, 0)).await;

        assert_eq!(status, StatusCode::OK, "{}", body.message);
        assert_eq!(body.message, "FundsTx successfully created. Sign the provided hash.");
        let stored = h.state.store.get(&hash_of(&body)).unwrap().unwrap();
        assert_eq!(stored.fee, 1);
    }

    #[tokio::test]
    async fn missing_arguments_are_bad_request() {
        let h = harness();
        let (status, body) = post_json(&h.router, "/tx/funds", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 400);
        assert_eq!(body.message, "argument missing: from");
        assert_eq!(h.state.store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let h = harness();
        let (status, body) = post_raw(&h.router, "/tx/funds", b"{not json".to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 400);
    }

    #[tokio::test]
    async fn sign_then_submit() {
        let h = harness();
        let (_, body) = post_json(&h.router, "/tx/funds", funds_body(&h, 2)).await;
        let hash = hash_of(&body);

        let sig = sign_hash(&h.sender, hash.as_bytes()).unwrap();
        let (status, body) = post_json(
            &h.router,
            "/tx/signature",
            serde_json::json!({ "hash": hash.to_hex(), "signature": sig.to_hex() }),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{}", body.message);
        assert_eq!(body.message, "Tx successfully sent to network.");
        assert_eq!(hash_of(&body), hash);
        assert_eq!(h.state.store.get(&hash).unwrap().unwrap().sig1, sig);

        let sent = h.node.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].msg_type, MessageType::FundsTxBroadcast);
        assert_eq!(h.state.metrics.submitted_total.get(), 1);
    }

    #[tokio::test]
    async fn signature_for_unknown_hash_is_not_found() {
        let h = harness();
        let (status, _) = post_json(
            &h.router,
            "/tx/signature",
            serde_json::json!({
                "hash": TxHash([9; 32]).to_hex(),
                "signature": Signature([1; 64]).to_hex(),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(h.node.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_bad_gateway() {
        let h = harness_with(true);
        let (_, body) = post_json(&h.router, "/tx/funds", funds_body(&h, 1)).await;
        let hash = hash_of(&body);

        let sig = sign_hash(&h.sender, hash.as_bytes()).unwrap();
        let (status, _) = post_json(
            &h.router,
            "/tx/signature",
            serde_json::json!({ "hash": hash.to_hex(), "signature": sig.to_hex() }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(h.state.metrics.submission_failures_total.get(), 1);
        // The signature stays attached for a later resubmission.
        assert!(h.state.store.get(&hash).unwrap().unwrap().is_signed());
    }

    #[tokio::test]
    async fn update_keeps_target_hash() {
        let h = harness();
        let (_, body) = post_json(&h.router, "/tx/funds", funds_body(&h, 1)).await;
        let target = hash_of(&body);

        let (status, body) = post_json(
            &h.router,
            "/tx/update",
            serde_json::json!({
                "tx_hash": target.to_hex(),
                "tx_issuer": h.sender.to_fields().join(" "),
                "chparams": h.params_file,
                "update_data": "rent (corrected)",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{}", body.message);
        assert_eq!(body.message, "UpdateTx successfully created. Sign the provided hash.");
        let redacted = h.state.store.get(&target).unwrap().unwrap();
        assert_eq!(redacted.data, b"rent (corrected)");
        assert_eq!(h.state.metrics.redacted_total.get(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_target_is_not_found() {
        let h = harness();
        let (status, _) = post_json(
            &h.router,
            "/tx/delete",
            serde_json::json!({
                "tx_hash": TxHash([4; 32]).to_hex(),
                "tx_issuer": h.sender.to_fields().join(" "),
                "chparams": h.params_file,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(h.state.metrics.redacted_total.get(), 0);
    }

    #[tokio::test]
    async fn transaction_lookup() {
        let h = harness();
        let (_, body) = post_json(&h.router, "/tx/funds", funds_body(&h, 1)).await;
        let hash = hash_of(&body);

        let (status, body) = get(&h.router, &format!("/tx/{}", hash.to_hex())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.content.contains(&Content::new("Kind", "FundsTx")));
        assert!(body.content.contains(&Content::new("Data", hex::encode("rent"))));
        assert!(body.content.contains(&Content::new("Signed", false)));

        let (status, _) = get(&h.router, "/tx/not-hex").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(&h.router, &format!("/tx/{}", TxHash([1; 32]).to_hex())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn account_lookup() {
        let h = harness();
        let (status, body) = get(&h.router, &format!("/account/{}", h.known.to_hex())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.content.contains(&Content::new("Balance", 75)));
        assert!(body.content.contains(&Content::new("IsRoot", false)));

        let stranger = PrivateKey::generate().address();
        let (status, body) = get(&h.router, &format!("/account/{}", stranger.to_hex())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Account does not exist.");

        let (status, _) = get(&h.router, "/account/abcd").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_statuses() {
        assert_eq!(
            status_for(&ClientError::missing("fee")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ClientError::NotFound(TxHash([0; 32]))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ClientError::Timeout { timeout_ms: 10 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&ClientError::Crypto("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
