//! Tracing subscriber setup
//!
//! Native builds log to stderr with an `EnvFilter` taken from `RUST_LOG`;
//! wasm builds write to the browser console.

use tracing::Level;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sysmon={level_str},sysmon_auth={level_str},sysmon_http={level_str}").into()
    })
}

/// Initialize tracing
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
#[cfg(not(target_arch = "wasm32"))]
pub fn init_tracing(level: Level) -> Result<(), TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(level))
        .try_init()
}

/// Initialize tracing
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
#[cfg(target_arch = "wasm32")]
pub fn init_tracing(level: Level) -> Result<(), TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(tracing_web::MakeWebConsoleWriter::new());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter(level))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init_tracing(Level::DEBUG);
        assert!(init_tracing(Level::DEBUG).is_err());
    }
}
