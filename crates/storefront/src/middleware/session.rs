//! Session middleware configuration.
//!
//! Each visitor's cart and checkout live in their session. Sessions are held
//! in process memory, so they do not survive a restart; committed orders do,
//! because they are written to the order log.
//!
//! `MemoryStore` skips expired records when loading but never deletes them,
//! so abandoned sessions stay in memory until the process restarts. A
//! long-running deployment should move to a store with expired-session
//! deletion.

use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{SameSite, time::Duration},
};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shoe_session";

/// Idle time after which a session (and its cart) is dropped: 7 days.
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer backed by an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
