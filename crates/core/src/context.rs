//! Context window selection.
//!
//! Bounding the context caps request payload size, latency, and cost. A
//! fixed-size sliding window over the tail of the history is the
//! simplest policy that satisfies that goal, and it is intentionally
//! role-unaware: no pinning of system prompts.

use crate::error::Error;
use crate::message::Message;

/// Select the context window: the last `limit` messages of `history`,
/// in original order.
///
/// Returns the full history unchanged when it fits within `limit`. The
/// returned slice borrows from `history` — the window is a view,
/// recomputed each turn, never stored.
///
/// A `limit` of zero is a caller contract violation and fails with
/// [`Error::InvalidConfiguration`].
pub fn select(history: &[Message], limit: usize) -> Result<&[Message], Error> {
    if limit == 0 {
        return Err(Error::InvalidConfiguration {
            message: "context window size must be at least 1".into(),
        });
    }
    let start = history.len().saturating_sub(limit);
    Ok(&history[start..])
}
