//! Storefront configuration check.

use tajeer_storefront::config::{ConfigError, StorefrontConfig};
use tracing::info;

/// Load the storefront configuration the way the server does and log a
/// redacted summary.
///
/// # Errors
///
/// Returns the first missing, invalid or insecure variable.
pub fn check() -> Result<(), ConfigError> {
    let config = StorefrontConfig::from_env()?;

    info!(
        listen = %config.socket_addr(),
        base_url = %config.base_url,
        secure_cookies = config.is_secure(),
        backend = ?config.backend,
        log_format = ?config.log_format,
        sentry = config.sentry_dsn.is_some(),
        "Configuration OK"
    );
    Ok(())
}
