//! # Network Module
//!
//! Everything that talks to the bootstrap node.
//!
//! ```text
//! message.rs    — wire message type codes
//! transport.rs  — length-prefixed framing, Transport trait, TCP transport
//! dispatch.rs   — Submission Dispatcher: broadcast a finalized transaction
//! bridge.rs     — Request Bridge: awaitable account queries with timeout
//! ```
//!
//! ## Design Decisions
//!
//! - `Transport` is an async trait so tests drive the dispatcher and the
//!   bridge without sockets.
//! - Submission is at-most-once. Nothing in this module retries.
//! - The bridge correlates responses by request id, so several queries may
//!   be in flight at once. Each waiter has its own timeout.

pub mod bridge;
pub mod dispatch;
pub mod message;
pub mod transport;

pub use bridge::{AccountRequest, RequestBridge};
pub use dispatch::Dispatcher;
pub use message::MessageType;
pub use transport::{read_frame, Frame, TcpTransport, Transport};
