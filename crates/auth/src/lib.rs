//! Client-side authentication session for the sysmon front-end
//!
//! [`AuthSession`] keeps the bearer token issued by the login endpoint,
//! persists it through a [`KeyValueStore`] and mirrors it into the shared
//! [`sysmon_http::ApiClient`] as a default `Authorization` header.

pub mod config;
pub mod error;
pub mod logging;
pub mod messages;
pub mod session;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod provider;

pub use config::AuthConfig;
pub use error::{LoginError, StorageError};
pub use messages::Locale;
pub use session::{AuthSession, LoginOutcome, Session, token_preview};
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;

#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStore;
