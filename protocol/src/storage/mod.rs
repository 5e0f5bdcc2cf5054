//! # Storage Module
//!
//! Local persistence for the client.
//!
//! ```text
//! block.rs  — cached block headers
//! db.rs     — TxStore: sled trees per transaction kind, plus header trees
//! locks.rs  — per-hash locks for read-modify-write on one record
//! ```
//!
//! Bincode for on-disk values: compact and deterministic. JSON stays at the
//! REST boundary.

pub mod block;
pub mod db;
pub mod locks;

pub use block::BlockHeader;
pub use db::{DbError, DbResult, TxStore};
pub use locks::TxLocks;
