//! Fee defaulting at the user-facing boundary.
//!
//! The protocol crate rejects a zero fee outright. Both front ends treat an
//! absent or zero fee as "use the minimum" and rewrite it before the
//! arguments reach the preparer.

use chameleon_protocol::config::MIN_FEE;

/// `0` becomes [`MIN_FEE`]; anything else passes through.
pub fn coerce_fee(fee: u64) -> u64 {
    if fee == 0 {
        tracing::debug!(min_fee = MIN_FEE, "fee not set, using minimum");
        MIN_FEE
    } else {
        fee
    }
}
