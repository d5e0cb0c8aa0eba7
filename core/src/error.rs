//! Error types shared by every layer of the client.
//!
//! # Design
//! `NetworkError` is a closed set. Each variant carries only what a caller
//! needs to act on it: the status code for `RequestFailed`, a cause string
//! for `Transport`, the parser diagnostic for `DecodingFailed`. Nothing is
//! retried; every variant is terminal for the call that produced it.
//!
//! `Cancelled` is kept apart from `Transport` so that a caller that gave up on
//! a request can tell that outcome from a network failure.

use thiserror::Error;

/// Errors returned by the endpoint builder, the dispatcher and the API manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The endpoint could not be turned into an absolute URL.
    #[error("invalid URL")]
    InvalidUrl,

    /// The request never reached the server, or no response came back.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status. The body is discarded.
    #[error("request failed with HTTP {status}")]
    RequestFailed { status: u16 },

    /// The body did not match the expected schema.
    #[error("decoding failed: {0}")]
    DecodingFailed(String),

    /// The server answered 2xx with an empty body.
    #[error("no data in response")]
    NoData,

    /// The caller cancelled the fetch before the round trip completed.
    #[error("request cancelled")]
    Cancelled,
}

impl NetworkError {
    /// Status code for `RequestFailed`, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::RequestFailed { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, NetworkError::Cancelled)
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::DecodingFailed(err.to_string())
    }
}
