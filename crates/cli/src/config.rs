//! CLI configuration utilities

use anyhow::{Context, Result};
use std::path::Path;
use sysmon_auth::AuthConfig;

/// Load the auth configuration from `path`, or from defaults and environment
pub fn load_config(path: Option<&Path>) -> Result<AuthConfig> {
    match path {
        Some(path) => AuthConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => AuthConfig::from_env().context("Failed to load configuration from environment"),
    }
}

/// Render the effective configuration as pretty JSON
pub fn render_config(config: &AuthConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}
