//! Error types for backend calls

use bridge_traits::error::BridgeError;
use serde::Deserialize;
use thiserror::Error;

/// Message shown to the user for any transport-level failure.
pub const NETWORK_ERROR_MESSAGE: &str = "network error";

/// Backend call errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No usable response: unreachable host, timeout, or a success body that
    /// could not be decoded.
    #[error("network error")]
    Transport {
        /// Diagnostic detail, for logs only.
        detail: String,
    },

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },
}

/// Result type for backend calls
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    pub fn transport(detail: impl Into<String>) -> Self {
        ApiError::Transport {
            detail: detail.into(),
        }
    }

    /// Builds a server error from a non-2xx response body.
    ///
    /// Uses the body's `message` when it decodes and is non-empty, otherwise
    /// `HTTP <status>`.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));

        ApiError::Server { status, message }
    }

    /// Message suitable for display.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Transport { .. } => NETWORK_ERROR_MESSAGE,
            ApiError::Server { message, .. } => message,
        }
    }

    /// HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { .. } => None,
            ApiError::Server { status, .. } => Some(*status),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

impl From<BridgeError> for ApiError {
    fn from(error: BridgeError) -> Self {
        ApiError::transport(error.to_string())
    }
}
