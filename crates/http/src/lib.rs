//! Sysmon HTTP module providing the shared API client
//!
//! Every request issued through an [`client::ApiClient`] (or any of its clones)
//! carries the client's default headers, which is how a bearer token set at
//! login reaches all later API calls.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder, error::ClientError};
pub use types::{LoginRequest, LoginResponse};
