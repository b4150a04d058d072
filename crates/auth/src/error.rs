//! Error types for the auth session

use sysmon_http::ClientError;
use thiserror::Error;

/// Why a login attempt did not produce a session
#[derive(Debug, Error)]
pub enum LoginError {
    /// The server answered but refused the credentials, or reported success
    /// without issuing a token
    #[error("Login rejected: {}", .message.as_deref().unwrap_or("no reason given"))]
    ServerRejected { message: Option<String> },

    /// The request did not complete: network error, error status or an
    /// undecodable body
    #[error("Login request failed: {0}")]
    TransportFailure(#[from] ClientError),
}

impl LoginError {
    /// Non-empty message supplied by the server, if any
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::ServerRejected { message } => message.clone().filter(|m| !m.is_empty()),
            Self::TransportFailure(err) => err.server_message(),
        }
    }
}

/// Key-value store failures
#[derive(Debug, Error)]
pub enum StorageError {
    /// No backing store is reachable (e.g. storage disabled in the browser)
    #[error("Storage is unavailable")]
    Unavailable,

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error reported by the platform storage API
    #[error("Storage backend error: {0}")]
    Backend(String),
}
