//! Error types for the resource client.

use std::sync::Arc;

use thiserror::Error;

/// Failure of the underlying transport, before any status line was seen.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The path could not be resolved against the base URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connecting, sending or reading the body failed.
    #[error("Connection failed: {0}")]
    Connection(#[from] reqwest::Error),
}

/// Errors surfaced by [`ResourceClient`](super::ResourceClient).
///
/// `Clone` so a single failed template fetch can be handed to every
/// requester waiting on it.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Non-2xx response.
    #[error("{status} {status_text}")]
    Status { status: u16, status_text: String },

    /// The request body could not be serialized; nothing was sent.
    #[error("Failed to encode request body for '{url}': {source}")]
    Encode {
        url: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The body did not decode as its declared content type, or did not
    /// have the shape the caller asked for.
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The request never produced a response.
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Arc<TransportError>,
    },
}

impl ClientError {
    /// Status code for `Status` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn encode(url: &str, source: serde_json::Error) -> Self {
        ClientError::Encode {
            url: url.to_string(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn decode(url: &str, source: serde_json::Error) -> Self {
        ClientError::Decode {
            url: url.to_string(),
            source: Arc::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_code_and_text() {
        let err = ClientError::Status {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "404 Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err = ClientError::decode("/api/taxes", source);
        assert!(err.status().is_none());
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Failed to decode response from '/api/taxes'"));
    }
}
