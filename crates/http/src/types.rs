//! Wire types for the monitor API

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Login request body
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Build a request from raw credentials; nothing is validated
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Hand-written so the password never ends up in a log line.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Profile returned by some servers; accepted and not interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<JsonValue>,
}

impl LoginResponse {
    /// Token carried by a successful response, ignoring empty strings
    pub fn issued_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .filter(|token| self.success && !token.is_empty())
    }
}
