//! # Network Module
//!
//! Submission of signed transactions to a ledger server over its websocket
//! API.
//!
//! ## Architecture
//!
//! ```text
//! messages.rs  submit request, server message, SubmitResult
//! remote.rs    Remote (one connection, id-routed responses), submit_blob
//! ```
//!
//! ## Design Decisions
//!
//! - The websocket protocol itself comes from `tokio-tungstenite`; TLS for
//!   `wss://` uses rustls with the webpki root set.
//! - An engine rejection (`tec...`, `tem...`) is a successful submission and
//!   comes back as `Ok(SubmitResult)`. Only transport, timeout, and
//!   server-side request errors are [`SubmitError`]s.
//! - No timeout unless one is asked for.

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

pub mod messages;
pub mod remote;

pub use messages::{ServerMessage, SubmitRequest, SubmitResult};
pub use remote::{submit_blob, Remote};

/// Failures while submitting a transaction.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("cannot connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to send request: {0}")]
    Send(#[source] Box<tungstenite::Error>),

    #[error("connection closed before a response arrived")]
    ConnectionClosed,

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("submission cancelled")]
    Cancelled,

    /// The server refused the request itself (bad blob, bad params).
    #[error("server error {error}: {message}")]
    Server { error: String, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_encoding_is_not_a_response_error() {
        let json_err = serde_json::from_str::<u32>("{").unwrap_err();
        let err = SubmitError::Encode(json_err);
        assert!(err.to_string().starts_with("failed to encode request"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!matches!(err, SubmitError::MalformedResponse(_)));
    }
}
