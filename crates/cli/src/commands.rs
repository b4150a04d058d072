//! CLI commands

use anyhow::{Result, bail};
use clap::Subcommand;
use serde_json::{Value, json};
use std::sync::Arc;
use sysmon_auth::{AuthConfig, AuthSession, FileStore, token_preview};
use sysmon_http::ApiClient;
use tracing::{debug, info};

use crate::config;

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the issued token
    Login {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "SYSMON_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored token
    Logout,

    /// Show whether a token is stored
    Status,

    /// Send an authenticated GET request and print the JSON response
    Get {
        /// API path, e.g. /api/system/info
        path: String,
    },

    /// Configuration operations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
}

/// Build the session the way a page load does: restore, then re-apply the header
fn open_session(config: &AuthConfig) -> Result<AuthSession> {
    let client = ApiClient::new(&config.base_url)?;
    let state_dir = config.state_dir();
    debug!("Using session store in {}", state_dir.display());

    let session = AuthSession::new(client, Arc::new(FileStore::new(state_dir)), config);
    session.initialize_auth();
    Ok(session)
}

impl Commands {
    pub async fn execute(self, config: &AuthConfig) -> Result<()> {
        match self {
            Self::Login { username, password } => {
                let session = open_session(config)?;
                let outcome = session.login(&username, &password).await;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                if !outcome.success {
                    bail!(
                        "Login failed: {}",
                        outcome.message.as_deref().unwrap_or_default()
                    );
                }
                Ok(())
            }
            Self::Logout => {
                let session = open_session(config)?;
                session.logout();
                println!("Logged out");
                Ok(())
            }
            Self::Status => {
                let session = open_session(config)?;
                let status = json!({
                    "authenticated": session.is_authenticated(),
                    "token": session.token().as_deref().map(token_preview),
                    "base_url": config.base_url,
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
                Ok(())
            }
            Self::Get { path } => {
                let session = open_session(config)?;
                if !session.is_authenticated() {
                    info!("No stored token, sending request without authorization");
                }
                let body: Value = session.client().get_json(&path).await?;
                println!("{}", serde_json::to_string_pretty(&body)?);
                Ok(())
            }
            Self::Config { command } => command.execute(config),
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, config: &AuthConfig) -> Result<()> {
        match self {
            Self::Show => {
                println!("{}", config::render_config(config)?);
                Ok(())
            }
        }
    }
}
