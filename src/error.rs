//! Error types for the feed pipeline.
//!
//! Each kind has a fixed blast radius: a `TransportError` ends the session,
//! a `DecodeError` costs one frame, a `ForwardError` costs one forwarding call.

use thiserror::Error;

/// The feed connection failed or broke.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error("failed to send frame {frame:?}: {source}")]
    Send {
        frame: &'static str,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error("feed stream error: {0}")]
    Stream(#[source] tokio_tungstenite::tungstenite::Error),
}

/// A frame matched an event prefix but its payload was not a valid event.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{event} frame has a malformed envelope")]
    MissingEnvelope { event: &'static str },

    #[error("invalid {event} payload: {source}")]
    InvalidPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A call to the sniper service failed.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

impl ForwardError {
    /// The URL the failed call was aimed at.
    pub fn url(&self) -> &str {
        match self {
            ForwardError::Request { url, .. } | ForwardError::Status { url, .. } => url.as_str(),
        }
    }
}
