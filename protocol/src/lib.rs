// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Chameleon Protocol — Client Core
//!
//! The client side of a ledger whose transactions can be edited after they
//! are broadcast. Each redactable transaction is identified by a chameleon
//! hash: a hash that whoever holds the trapdoor can make collide on demand.
//! When a transaction's `data` changes, the client computes a new check
//! string so the identifier everyone already recorded still points at it.
//!
//! ## Lifecycle
//!
//! ```text
//!   prepare ──▶ (hash out, sign elsewhere) ──▶ attach signature ──▶ submit
//!                                                   │
//!                       redact / delete ◀───────────┘  (any time later)
//! ```
//!
//! Private keys never have to enter this process: the preparer hands out a
//! hash, the caller signs it with whatever custody it uses, and the
//! signature coordinator takes the 64 bytes back.
//!
//! ## Modules
//!
//! - **config** — Constants, message codes, and the `ClientConfig` object.
//! - **error** — The `ClientError` taxonomy.
//! - **crypto** — secp256k1 keys and signatures, SHA3, the BN254 chameleon hash.
//! - **transaction** — The transaction model and its canonical content hash.
//! - **resolver** — Keys and parameters from files or inline strings.
//! - **storage** — The sled-backed pending transaction store.
//! - **lifecycle** — Preparer, signature coordinator, redaction engine.
//! - **network** — Framing, submission dispatcher, request bridge.
//! - **account** — Account queries on top of the request bridge.
//!
//! ## Ground Rules
//!
//! 1. A staged transaction's hash never changes. Not on signing, not on
//!    redaction.
//! 2. Store entries are never removed. Deleting means redacting to empty.
//! 3. Errors go back to the caller. Nothing here retries.

pub mod account;
pub mod config;
pub mod crypto;
pub mod error;
pub mod lifecycle;
pub mod network;
pub mod resolver;
pub mod storage;
pub mod transaction;

pub use error::{ClientError, ClientResult};
