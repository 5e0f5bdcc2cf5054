//! # Prometheus Metrics
//!
//! Counters for the transaction lifecycle, served at `GET /metrics` by the
//! REST front end. Everything lives in a dedicated registry with the
//! `chameleon` prefix.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::api::AppState;

/// Metric handles. Cheap to clone; prometheus handles are `Arc`s inside.
#[derive(Clone)]
pub struct ClientMetrics {
    registry: Registry,
    /// Transactions staged, labelled by kind.
    pub prepared_total: IntCounterVec,
    /// Transactions handed to the network successfully.
    pub submitted_total: IntCounter,
    /// Submissions that failed at the transport.
    pub submission_failures_total: IntCounter,
    /// Successful redactions (updates and deletes).
    pub redacted_total: IntCounter,
    /// Wall time of a redaction: lookup, collision, rewrite.
    pub redaction_seconds: Histogram,
}

impl ClientMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("chameleon".into()), None)?;

        let prepared_total = IntCounterVec::new(
            Opts::new("transactions_prepared_total", "Transactions staged for signing"),
            &["kind"],
        )?;
        registry.register(Box::new(prepared_total.clone()))?;

        let submitted_total = IntCounter::new(
            "transactions_submitted_total",
            "Transactions sent to the bootstrap node",
        )?;
        registry.register(Box::new(submitted_total.clone()))?;

        let submission_failures_total = IntCounter::new(
            "submission_failures_total",
            "Transaction sends that failed at the transport",
        )?;
        registry.register(Box::new(submission_failures_total.clone()))?;

        let redacted_total =
            IntCounter::new("transactions_redacted_total", "Successful redactions")?;
        registry.register(Box::new(redacted_total.clone()))?;

        let redaction_seconds = Histogram::with_opts(
            HistogramOpts::new("redaction_seconds", "Redaction latency in seconds").buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ]),
        )?;
        registry.register(Box::new(redaction_seconds.clone()))?;

        Ok(Self {
            registry,
            prepared_total,
            submitted_total,
            submission_failures_total,
            redacted_total,
            redaction_seconds,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// `GET /metrics`.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
