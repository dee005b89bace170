//! Error types for the API client core.
//!
//! # Design
//! Errors split along the I/O boundary. `Encoding` and `InvalidUrl` are
//! produced while building a request and are returned synchronously, before
//! anything touches the network. `Transport`, `Api`, `Decoding` and
//! `Cancelled` only ever come out of a `SessionTask` view.
//!
//! The transport cause is held behind an `Arc` so that every view on the same
//! task can report the same failure.

use std::error::Error as StdError;
use std::sync::Arc;

/// Shared, type-erased cause of a transport failure.
pub type TransportCause = Arc<dyn StdError + Send + Sync + 'static>;

/// Errors returned by the encoder, builder, session and task views.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A parameter value has a type the encoder cannot represent.
    #[error("cannot encode parameter `{key}`: {reason}")]
    Encoding { key: String, reason: String },

    /// The endpoint path does not combine with the base URL.
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced a response (network error, timeout).
    #[error("transport failed: {0}")]
    Transport(#[source] TransportCause),

    /// The server answered, but reported a failure.
    #[error("API error (HTTP {status}): {payload}")]
    Api {
        status: u16,
        payload: serde_json::Value,
    },

    /// The response body does not have the requested shape.
    #[error("decoding failed: {0}")]
    Decoding(String),

    /// The task was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// The HTTP client could not be constructed, or no Tokio runtime was
    /// available to dispatch on.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub(crate) fn encoding(key: &str, reason: impl Into<String>) -> Self {
        Error::Encoding {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status carried by an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
