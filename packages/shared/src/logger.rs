//! Logging setup shared by the server and client binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the library crates and the binary log at `default_log_level` unless
/// `RUST_LOG` overrides it.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "neighborly-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use neighborly_shared::logger::setup_logger;
///
/// setup_logger("neighborly-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "neighborly_server={level},neighborly_client={level},{bin}={level},tower_http={level}",
            level = default_log_level,
            bin = binary_name.replace('-', "_"),
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
