pub mod api;
pub mod model;
pub mod sink;
pub mod store;

use std::sync::Arc;

use axum::Router;
use generp_core::Module;
use generp_kv::KVStore;

pub use model::{AuditAction, AuditEntry, AuditListQuery};
pub use sink::{AuditSink, NullSink};
pub use store::AuditStore;

/// The Audit module — append-only record of administrative actions.
///
/// Other modules emit entries through the [`AuditSink`] handle; this module
/// owns the storage and the read API.
pub struct AuditModule {
    store: Arc<AuditStore>,
}

impl AuditModule {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            store: Arc::new(AuditStore::new(kv)),
        }
    }

    /// Sink handle for modules that emit audit events.
    pub fn sink(&self) -> Arc<dyn AuditSink> {
        Arc::clone(&self.store) as Arc<dyn AuditSink>
    }

    pub fn store(&self) -> &Arc<AuditStore> {
        &self.store
    }
}

impl Module for AuditModule {
    fn name(&self) -> &str {
        "audit"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.store))
    }
}
