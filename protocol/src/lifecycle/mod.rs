//! # Lifecycle Module
//!
//! The components that move a transaction through its life on the client.
//!
//! ```text
//! preparer.rs     — validate, resolve, build, hash, stage
//! coordinator.rs  — attach external signatures, hand off to the dispatcher
//! redaction.rs    — swap a staged transaction's data under the same hash
//! ```
//!
//! All three share one [`TxStore`](crate::storage::TxStore) handle. None of
//! them caches transactions in memory; the store is the only copy.

pub mod coordinator;
pub mod preparer;
pub mod redaction;

pub use coordinator::SignatureCoordinator;
pub use preparer::{Prepared, TxPreparer};
pub use redaction::RedactionEngine;
