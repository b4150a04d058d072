//! Authentication endpoints

use super::{ApiClient, error::ClientError};
use crate::types::{LoginRequest, LoginResponse};
use tracing::debug;

/// Default path of the login endpoint
pub const LOGIN_PATH: &str = "/api/login";

impl ApiClient {
    /// Post credentials to the login endpoint at `path`
    ///
    /// A 2xx answer is decoded as [`LoginResponse`] whatever its `success`
    /// flag says; interpreting it is up to the caller. Any other status is an
    /// error that keeps the response body.
    pub async fn login(
        &self,
        path: &str,
        request: &LoginRequest,
    ) -> Result<LoginResponse, ClientError> {
        debug!(path, "Sending login request");
        let req = self.request(reqwest::Method::POST, path).json(request);
        self.execute(req).await
    }
}
