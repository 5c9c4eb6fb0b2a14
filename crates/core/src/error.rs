//! Error types for the Yuki domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level `Error`
//! folds them together for callers that don't care which layer failed.

use thiserror::Error;

/// The top-level error type for all Yuki operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A configured value violates a caller contract (e.g. a zero-sized
    /// context window). Fatal to the turn, never retried.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // --- Client errors ---
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures raised by the HTTP chat client and stream decoder.
///
/// Malformed individual event lines are *not* represented here: the
/// decoder absorbs them locally and keeps going. Only protocol-level
/// rejection and transport-level failure propagate to the caller, so it
/// can tell either apart from a clean end of stream.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The server answered with a non-success status. Raised before any
    /// line of the body is decoded.
    #[error("Request rejected: {message} (status: {status_code})")]
    RequestRejected { status_code: u16, message: String },

    /// Connection drop, read error, or cancellation mid-stream. Deltas
    /// already emitted are not retracted; nothing further arrives.
    #[error("Transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read chat file at {path}: {reason}")]
    ReadError { path: String, reason: String },

    #[error("Failed to write chat file at {path}: {reason}")]
    WriteError { path: String, reason: String },

    #[error("Failed to parse chat file at {path}: {reason}")]
    ParseError { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_error_displays_status() {
        let err = Error::Client(ClientError::RequestRejected {
            status_code: 503,
            message: "overloaded".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn transport_and_rejection_are_distinct() {
        let transport = ClientError::Transport("connection reset".into());
        let rejected = ClientError::RequestRejected {
            status_code: 500,
            message: "boom".into(),
        };
        assert!(matches!(transport, ClientError::Transport(_)));
        assert!(matches!(rejected, ClientError::RequestRejected { .. }));
    }

    #[test]
    fn store_error_mentions_path() {
        let err = Error::Store(StoreError::ParseError {
            path: "/tmp/chat.json".into(),
            reason: "unexpected EOF".into(),
        });
        assert!(err.to_string().contains("/tmp/chat.json"));
    }
}
