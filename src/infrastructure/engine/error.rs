//! Engine client errors.

use thiserror::Error;

use crate::infrastructure::http::TransportError;

/// Errors from the engine-manager metadata API.
#[derive(Debug, Error)]
pub enum EngineClientError {
    /// The endpoint is not an absolute URL
    #[error("invalid engine endpoint {endpoint}: {reason}")]
    InvalidEndpoint {
        /// Endpoint as given
        endpoint: String,
        /// Parse error
        reason: String,
    },

    /// Connection, timeout, TLS or signing failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The engine manager answered with a status other than 200
    #[error("bad status: {status}")]
    BadStatus {
        /// Status line, e.g. `404 Not Found`
        status: String,
    },

    /// The 200 body is not an engine metadata document
    #[error("cannot decode engine metadata: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for EngineClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(TransportError::Http(err))
    }
}

impl EngineClientError {
    /// Status line for a non-200 response, e.g. `404 Not Found`.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::BadStatus {
            status: status.to_string(),
        }
    }
}
