//! Auth session configuration

use crate::messages::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use config::ConfigError;

/// Authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Origin of the monitor API
    pub base_url: String,

    /// Path of the login endpoint
    pub login_path: String,

    /// Key the token is persisted under
    pub token_key: String,

    /// Language of generic failure messages
    pub locale: Locale,

    /// Directory of the native session file
    pub state_dir: Option<PathBuf>,
}

impl AuthConfig {
    /// Login endpoint path
    pub const LOGIN_PATH: &'static str = sysmon_http::client::auth::LOGIN_PATH;

    /// Storage key for the bearer token
    pub const TOKEN_STORAGE_KEY: &'static str = "token";

    /// API origin used when nothing else is configured
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:5000";

    /// Prefix of environment overrides (`SYSMON_BASE_URL`, `SYSMON_LOCALE`, ...)
    pub const ENV_PREFIX: &'static str = "SYSMON";

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix(Self::ENV_PREFIX))
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from environment variables; unset fields keep their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix(Self::ENV_PREFIX))
            .build()?;

        settings.try_deserialize()
    }

    /// Directory holding the native session file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("sysmon")
        })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            login_path: Self::LOGIN_PATH.to_string(),
            token_key: Self::TOKEN_STORAGE_KEY.to_string(),
            locale: Locale::default(),
            state_dir: None,
        }
    }
}
