//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::db::JsonFileOrderLog;
use crate::middleware::SessionLocks;
use crate::services::CheckoutProcessor;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the product catalog, the checkout processor, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    checkout: CheckoutProcessor<Arc<JsonFileOrderLog>>,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state with the built-in catalog.
    ///
    /// The order log is opened at `config.order_log_path`; the file itself
    /// is created on the first committed order.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_catalog(config, Catalog::builtin())
    }

    /// Create a new application state with a custom catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let log = Arc::new(JsonFileOrderLog::new(config.order_log_path.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                checkout: CheckoutProcessor::new(log),
                session_locks: SessionLocks::default(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the checkout processor.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutProcessor<Arc<JsonFileOrderLog>> {
        &self.inner.checkout
    }

    /// Per-session request gates used by the session lock middleware.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }
}
