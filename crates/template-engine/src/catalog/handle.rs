//! Swappable reference to the current catalog
//!
//! Hot reload builds a complete new catalog and swaps it in. Callers holding
//! a snapshot keep reading the catalog they started with.

use std::sync::Arc;

use parking_lot::RwLock;

use super::registry::TemplateCatalog;

#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<TemplateCatalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The catalog currently being served
    pub fn snapshot(&self) -> Arc<TemplateCatalog> {
        Arc::clone(&self.current.read())
    }

    /// Atomically replace the served catalog, returning the previous one
    pub fn replace(&self, catalog: TemplateCatalog) -> Arc<TemplateCatalog> {
        let next = Arc::new(catalog);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        tracing::info!(
            "Template catalog replaced ({} -> {} templates)",
            previous.len(),
            self.current.read().len()
        );
        previous
    }
}
