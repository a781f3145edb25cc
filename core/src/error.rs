//! Error types for the rundesk API client.
//!
//! # Design
//! A remote service that answered with a non-2xx status is a `Request` error;
//! its display text is the message the service put in the body (`detail`,
//! then `message`), falling back to `Request failed: <status>`. A call that
//! never got a response is a `Transport` error carrying the underlying cause.
//! Neither kind is retried or recovered locally.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by `ApiClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service responded with a status outside 200-299.
    #[error("{message}")]
    Request {
        status: u16,
        message: String,
        /// Decoded response body, `Value::Null` when it was not JSON.
        body: Value,
    },

    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of a `Request` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Network-level failure: DNS, refused connection, broken I/O.
#[derive(Debug, Error)]
#[error("transport error: {source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            source: source.into(),
        }
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        Self::new(err)
    }
}

/// Failure to persist configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
