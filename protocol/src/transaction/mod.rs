//! # Transaction Module
//!
//! The data model every lifecycle component passes around.
//!
//! ```text
//! types.rs    — TxHash (the permanent identifier) and TxKind (the dispatch tag)
//! builder.rs  — Transaction, TxBody, constructors, canonical content hash
//! signing.rs  — signature slot rules and the local signing helper
//! ```
//!
//! ## Identity
//!
//! A transaction's identifier is fixed the moment it is prepared:
//!
//! - redactable kinds (account creation, funds transfer, update) use
//!   `ChameleonHash(params, check_string, content_hash)`;
//! - config and stake transactions use the content hash directly.
//!
//! Signatures and the check string are outside the content hash, so neither
//! signing nor redaction moves the identifier.

pub mod builder;
pub mod signing;
pub mod types;

pub use builder::{Transaction, TxBody};
pub use signing::{attach_signatures, sign_transaction};
pub use types::{TxHash, TxKind};
