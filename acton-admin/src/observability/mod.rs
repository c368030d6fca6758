//! Observability (structured logging)
//!
//! Actions and filters log through `tracing`; this module installs the
//! subscriber that renders those events.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilitySettings;

/// Initialize the logging stack
///
/// Sets up:
/// - Environment-based filtering (`RUST_LOG`, falling back to the configured directive)
/// - JSON output (production) or pretty output (development)
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use acton_admin::{config::AdminConfig, observability};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = AdminConfig::load_for_service("my-app")?;
/// observability::init(&config.observability)?;
/// tracing::info!("Admin started");
/// # Ok(())
/// # }
/// ```
pub fn init(settings: &ObservabilitySettings) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_directive));

    if settings.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()?;
    }

    tracing::debug!(service = %settings.service_name, "Logging initialized");
    Ok(())
}
