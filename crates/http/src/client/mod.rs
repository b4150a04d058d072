//! Sysmon HTTP client

pub mod auth;
pub mod error;

use error::ClientError;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

const DEFAULT_USER_AGENT: &str = concat!("sysmon-client/", env!("CARGO_PKG_VERSION"));

/// Shared API client
///
/// Clones share one default-header map: a header set through any clone is
/// sent by every clone from then on.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    default_headers: Arc<RwLock<HeaderMap>>,
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Snapshot of the headers attached to every request
    pub fn default_headers(&self) -> HeaderMap {
        self.default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current value of one default header
    pub fn default_header(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.default_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Set a header on all future requests, replacing any previous value
    pub fn set_default_header(&self, name: HeaderName, value: HeaderValue) {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, value);
    }

    /// Remove a default header, returning its previous value
    pub fn remove_default_header(&self, name: &HeaderName) -> Option<HeaderValue> {
        self.default_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Attach `Authorization: Bearer <token>` to all future requests
    pub fn set_bearer_token(&self, token: &str) -> Result<(), ClientError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
        value.set_sensitive(true);
        self.set_default_header(header::AUTHORIZATION, value);
        Ok(())
    }

    /// Stop sending the `Authorization` header
    pub fn clear_bearer_token(&self) {
        self.remove_default_header(&header::AUTHORIZATION);
    }

    /// The `Authorization` default header as a string
    pub fn authorization(&self) -> Option<String> {
        self.default_header(&header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Create a request builder carrying the default headers
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url).headers(self.default_headers())
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Response received");

        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }

    /// GET a JSON document
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ClientError> {
        let request = self.request(reqwest::Method::GET, path);
        self.execute(request).await
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    default_headers: HeaderMap,
}

impl ApiClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Seed a default header
    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is empty".into()));
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let client = ClientBuilder::new().user_agent(user_agent).build()?;

        Ok(ApiClient {
            client,
            base_url,
            default_headers: Arc::new(RwLock::new(self.default_headers)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_is_shared_between_clones() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        let clone = client.clone();

        client.set_bearer_token("abc").unwrap();
        assert_eq!(clone.authorization().as_deref(), Some("Bearer abc"));

        clone.clear_bearer_token();
        assert_eq!(client.authorization(), None);
    }

    #[test]
    fn test_bearer_token_rejects_control_characters() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let result = client.set_bearer_token("bad\ntoken");
        assert!(matches!(result, Err(ClientError::InvalidHeader(_))));
        assert_eq!(client.authorization(), None);
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000///").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_builder_rejects_empty_base_url() {
        let result = ApiClient::new("/");
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }
}
