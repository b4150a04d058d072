//! The authentication session

use crate::config::AuthConfig;
use crate::error::LoginError;
use crate::messages::{self, Locale};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::{Arc, PoisonError, RwLock};
use sysmon_http::{ApiClient, LoginRequest};
use tracing::{debug, info, warn};

/// Token and user of the current session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    /// Reserved for a user profile; never populated
    pub user: Option<JsonValue>,
}

impl Session {
    /// Token, if present and non-empty
    pub fn active_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Result of [`AuthSession::login`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginOutcome {
    pub const fn succeeded() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Collapse a login result into the caller-facing shape
    pub fn from_result(result: Result<(), LoginError>, locale: Locale) -> Self {
        match result {
            Ok(()) => Self::succeeded(),
            Err(err) => Self::failed(messages::user_facing_message(&err, locale)),
        }
    }
}

/// Short form of a token that is safe to log
pub fn token_preview(token: &str) -> String {
    const EDGE: usize = 10;

    let len = token.chars().count();
    if len > EDGE {
        let head: String = token.chars().take(EDGE).collect();
        let tail: String = token.chars().skip(len - EDGE).collect();
        format!("{head}...{tail}")
    } else {
        "token_present".to_string()
    }
}

/// Client-side authentication state
///
/// Owns the session token. The persisted copy in the store and the
/// `Authorization` default header of the shared client follow every change
/// made through `login` and `logout`.
pub struct AuthSession {
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
    login_path: String,
    token_key: String,
    locale: Locale,
    state: RwLock<Session>,
}

impl AuthSession {
    /// Create a session, restoring any token persisted under the configured key
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>, config: &AuthConfig) -> Self {
        let token = match store.get(&config.token_key) {
            Ok(token) => token,
            Err(err) => {
                warn!("Failed to read persisted token: {err}");
                None
            }
        };
        debug!(restored = token.is_some(), "Auth session created");

        Self {
            client,
            store,
            login_path: config.login_path.clone(),
            token_key: config.token_key.clone(),
            locale: config.locale,
            state: RwLock::new(Session { token, user: None }),
        }
    }

    /// Session using the default endpoint, key and locale
    pub fn with_defaults(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(client, store, &AuthConfig::default())
    }

    /// The shared client carrying the session's `Authorization` header
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn snapshot(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().token
    }

    pub fn user(&self) -> Option<JsonValue> {
        self.snapshot().user
    }

    /// Whether a non-empty token is held
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .active_token()
            .is_some()
    }

    /// Log in, reporting failure as data rather than an error
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        LoginOutcome::from_result(self.try_login(username, password).await, self.locale)
    }

    /// Log in with exactly one request to the login endpoint
    ///
    /// On success the token is stored in the session, persisted and set as
    /// the shared client's bearer token. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// [`LoginError::ServerRejected`] when the server refuses the credentials
    /// or issues no token, [`LoginError::TransportFailure`] when the request
    /// itself fails.
    pub async fn try_login(&self, username: &str, password: &str) -> Result<(), LoginError> {
        let request = LoginRequest::new(username, password);
        let response = match self.client.login(&self.login_path, &request).await {
            Ok(response) => response,
            Err(err) => {
                warn!("Login request failed: {err}");
                return Err(err.into());
            }
        };

        let Some(token) = response.issued_token().map(str::to_string) else {
            info!("Login rejected by server");
            return Err(LoginError::ServerRejected {
                message: response.message,
            });
        };

        // Header, store and state change under one guard so concurrent
        // logins cannot leave them holding different tokens
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.client.set_bearer_token(&token)?;
        if let Err(err) = self.store.set(&self.token_key, &token) {
            warn!("Failed to persist token: {err}");
        }
        info!("Login succeeded, token saved: {}", token_preview(&token));
        state.token = Some(token);
        Ok(())
    }

    /// Drop the token everywhere it is held
    pub fn logout(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Session::default();
        if let Err(err) = self.store.remove(&self.token_key) {
            warn!("Failed to remove persisted token: {err}");
        }
        self.client.clear_bearer_token();
        drop(state);
        info!("Logged out");
    }

    /// Re-apply a restored token to the shared client
    ///
    /// Headers live only in process memory, so a token restored from the
    /// store has to be pushed back into the client once at startup.
    pub fn initialize_auth(&self) {
        let session = self.snapshot();
        let Some(token) = session.active_token() else {
            info!("No token found for initialization");
            return;
        };

        match self.client.set_bearer_token(token) {
            Ok(()) => {
                info!("Auth initialized with token: {}", token_preview(token));
                info!("Authorization header configured successfully");
            }
            Err(err) => warn!("Restored token cannot be used as a header: {err}"),
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("base_url", &self.client.base_url())
            .field("login_path", &self.login_path)
            .field("token_key", &self.token_key)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use mockall::mock;

    mock! {
        pub Store {}

        impl KeyValueStore for Store {
            fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
            fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
            fn remove(&self, key: &str) -> Result<(), StorageError>;
        }
    }

    fn offline_client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9").unwrap()
    }

    #[test]
    fn test_token_preview() {
        assert_eq!(token_preview("short"), "token_present");
        assert_eq!(token_preview("0123456789"), "token_present");
        assert_eq!(
            token_preview("0123456789abcdefghijABCDEFGHIJ"),
            "0123456789...ABCDEFGHIJ"
        );
        assert_eq!(token_preview("令牌令牌令牌令牌令牌令"), "令牌令牌令牌令牌令牌...牌令牌令牌令牌令牌令");
    }

    #[test]
    fn test_restores_persisted_token() {
        let store = Arc::new(MemoryStore::with_entry("token", "restored"));
        let session = AuthSession::with_defaults(offline_client(), store);

        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("restored"));
        assert_eq!(session.user(), None);
        // Restoring alone does not touch the client
        assert_eq!(session.client().authorization(), None);
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let store = Arc::new(MemoryStore::with_entry("token", ""));
        let session = AuthSession::with_defaults(offline_client(), store);

        assert!(!session.is_authenticated());
        session.initialize_auth();
        assert_eq!(session.client().authorization(), None);
    }

    #[test]
    fn test_initialize_auth_sets_header() {
        let store = Arc::new(MemoryStore::with_entry("token", "restored"));
        let session = AuthSession::with_defaults(offline_client(), store);

        session.initialize_auth();
        assert_eq!(
            session.client().authorization().as_deref(),
            Some("Bearer restored")
        );
    }

    #[test]
    fn test_initialize_auth_without_token_is_noop() {
        let session = AuthSession::with_defaults(offline_client(), Arc::new(MemoryStore::new()));

        session.initialize_auth();
        assert!(!session.is_authenticated());
        assert_eq!(session.client().authorization(), None);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = Arc::new(MemoryStore::with_entry("token", "restored"));
        let session = AuthSession::with_defaults(offline_client(), store.clone());
        session.initialize_auth();

        session.logout();
        let once = session.snapshot();
        session.logout();

        assert_eq!(session.snapshot(), once);
        assert_eq!(once, Session::default());
        assert!(!store.contains_key("token"));
        assert_eq!(session.client().authorization(), None);
    }

    #[test]
    fn test_custom_token_key() {
        let config = AuthConfig {
            token_key: "sysmon.token".into(),
            ..AuthConfig::default()
        };
        let store = Arc::new(MemoryStore::with_entry("sysmon.token", "abc"));
        let session = AuthSession::new(offline_client(), store.clone(), &config);
        assert_eq!(session.token().as_deref(), Some("abc"));

        session.logout();
        assert!(store.is_empty());
    }

    #[test]
    fn test_unreadable_store_starts_anonymous() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Err(StorageError::Unavailable));

        let session = AuthSession::with_defaults(offline_client(), Arc::new(store));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_logout_survives_store_failure() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some("restored".to_string())));
        store
            .expect_remove()
            .withf(|key| key == "token")
            .times(1)
            .returning(|_| Err(StorageError::Backend("quota".into())));

        let session = AuthSession::with_defaults(offline_client(), Arc::new(store));
        session.initialize_auth();
        session.logout();

        assert!(!session.is_authenticated());
        assert_eq!(session.client().authorization(), None);
    }

    #[test]
    fn test_outcome_shape() {
        let ok = serde_json::to_value(LoginOutcome::succeeded()).unwrap();
        assert_eq!(ok, serde_json::json!({ "success": true }));

        let failed = LoginOutcome::from_result(
            Err(LoginError::ServerRejected {
                message: Some("bad creds".into()),
            }),
            Locale::ZhCn,
        );
        assert_eq!(failed, LoginOutcome::failed("bad creds"));
    }
}
