//! Session middleware configuration.
//!
//! Checkout sessions live in an in-memory store: they hold a few kilobytes of
//! metadata, never document bytes, and are lost on restart.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tajeer_session";

/// Session expiry after inactivity (2 hours).
const SESSION_EXPIRY_SECONDS: i64 = 2 * 60 * 60;

/// Keys for values stored in the session.
pub mod session_keys {
    /// The shopper's [`CheckoutSession`](tajeer_core::CheckoutSession).
    pub const CHECKOUT: &str = "checkout";
    /// Device and traffic source captured on the first request.
    pub const VISIT: &str = "visit";
}

/// Create the session layer.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
