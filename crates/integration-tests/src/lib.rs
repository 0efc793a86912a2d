//! Integration tests for Almacén.
//!
//! These tests exercise the request lifecycle through the web crate's
//! store layer: catalog selection feeding the cart, cart mutations firing
//! autosave, and the workflow queues moving requests to completion. No
//! HTTP server is started; the store layer is the integration boundary.
//!
//! # Test Categories
//!
//! - `request_workflow` - Draft-to-confirmed lifecycle
//! - `catalog_selection` - Candidate construction and cart merging

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use almacen_core::RequestCode;
use almacen_web::catalog::Catalog;
use almacen_web::services::AutosaveHook;
use almacen_web::store::RequestStore;

/// Autosave hook that counts how often it fires.
#[derive(Default)]
pub struct CountingAutosave {
    count: AtomicUsize,
}

impl CountingAutosave {
    /// Number of notifications received so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl AutosaveHook for CountingAutosave {
    fn request_changed(&self, _code: RequestCode) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Shared context for store-level tests.
pub struct TestContext {
    pub catalog: Catalog,
    pub store: RequestStore,
    pub autosave: Arc<CountingAutosave>,
}

impl TestContext {
    /// Build a context with the seeded catalog, an empty store, and a
    /// counting autosave hook.
    #[must_use]
    pub fn new() -> Self {
        let autosave = Arc::new(CountingAutosave::default());
        Self {
            catalog: Catalog::seed(),
            store: RequestStore::new(autosave.clone()),
            autosave,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
