//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::AlmacenConfig;
use crate::services::LogAutosave;
use crate::store::RequestStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the read-only catalog, and the request store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AlmacenConfig,
    catalog: Catalog,
    requests: RequestStore,
}

impl AppState {
    /// Create a new application state with the seeded catalog and an empty
    /// request store wired to the logging autosave hook.
    #[must_use]
    pub fn new(config: AlmacenConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::seed(),
                requests: RequestStore::new(Arc::new(LogAutosave)),
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AlmacenConfig {
        &self.inner.config
    }

    /// Get a reference to the warehouse catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the request store.
    #[must_use]
    pub fn requests(&self) -> &RequestStore {
        &self.inner.requests
    }
}
