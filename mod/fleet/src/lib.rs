pub mod api;
pub mod authority;
pub mod model;
pub mod service;
pub mod store;

use std::sync::Arc;

use axum::Router;
use generp_audit::AuditSink;
use generp_core::Module;
use generp_kv::KVStore;

pub use authority::{TransitionError, allowed_targets, attempt_transition};
pub use model::{Machine, MachineStatus};
pub use service::FleetService;
pub use store::{KvMachineStore, MachineStore};

/// The Fleet module — machine inventory and status lifecycle.
///
/// Owns the machine store and the status service; status changes are
/// reported to the injected audit sink.
pub struct FleetModule {
    service: Arc<FleetService>,
}

impl FleetModule {
    pub fn new(kv: Arc<dyn KVStore>, audit: Arc<dyn AuditSink>) -> Self {
        let store = Arc::new(KvMachineStore::new(kv));
        Self {
            service: Arc::new(FleetService::new(store, audit)),
        }
    }

    pub fn service(&self) -> &Arc<FleetService> {
        &self.service
    }
}

impl Module for FleetModule {
    fn name(&self) -> &str {
        "fleet"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
