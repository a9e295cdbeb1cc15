use std::sync::Arc;

use tracing::{info, warn};

use generp_audit::{AuditAction, AuditEntry, AuditSink};
use generp_core::{ListResult, ServiceError, now_rfc3339};

use crate::authority;
use crate::model::{FleetStats, Machine, MachineListQuery, MachineStatus};
use crate::store::MachineStore;

/// Orchestrates status changes against durable storage.
///
/// Load → authority decision → checked persist → audit. Exactly one store
/// write per successful call; a failed call leaves the store untouched.
/// Concurrency policy is optimistic: the losing concurrent writer gets
/// [`ServiceError::Conflict`] and may re-read and retry — the service never
/// retries internally.
pub struct FleetService {
    store: Arc<dyn MachineStore>,
    audit: Arc<dyn AuditSink>,
}

impl FleetService {
    pub fn new(store: Arc<dyn MachineStore>, audit: Arc<dyn AuditSink>) -> Self {
        Self { store, audit }
    }

    pub fn store(&self) -> &Arc<dyn MachineStore> {
        &self.store
    }

    /// Change a machine's status.
    ///
    /// Only `status`, `version`, and `update_at` are touched; every other
    /// attribute is carried over unchanged.
    pub fn change_status(
        &self,
        id: &str,
        requested: MachineStatus,
        actor: Option<&str>,
    ) -> Result<Machine, ServiceError> {
        let current = self
            .store
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("machine {id} not found")))?;

        let new_status = authority::attempt_transition(current.status, requested)
            .map_err(|e| ServiceError::InvalidTransition(e.to_string()))?;

        let mut updated = current.clone();
        updated.status = new_status;
        updated.version = current.version + 1;
        updated.update_at = Some(now_rfc3339());

        if !self.store.update_checked(&updated, current.version)? {
            return Err(ServiceError::Conflict(format!(
                "machine {id} was modified concurrently; re-read and retry"
            )));
        }

        info!(machine = %id, from = %current.status, to = %new_status, "status changed");

        // The change is already committed — an audit failure is logged,
        // never surfaced to the caller.
        let action = if new_status == MachineStatus::Dispatched {
            AuditAction::DispatchUnit
        } else {
            AuditAction::UpdateStatus
        };
        let entry = AuditEntry::new(
            action,
            actor,
            Some(id),
            format!("{} -> {}", current.status, new_status),
        );
        if let Err(e) = self.audit.record(&entry) {
            warn!(machine = %id, error = %e, "failed to record audit entry");
        }

        Ok(updated)
    }

    /// Point read by id.
    pub fn get_machine(&self, id: &str) -> Result<Machine, ServiceError> {
        self.store
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("machine {id} not found")))
    }

    /// List machines with optional status filter and substring search.
    pub fn list_machines(
        &self,
        query: &MachineListQuery,
    ) -> Result<ListResult<Machine>, ServiceError> {
        let limit = query.limit.unwrap_or(50);
        let offset = query.offset.unwrap_or(0);

        let status = match &query.status {
            Some(s) => Some(MachineStatus::from_str(s).ok_or_else(|| {
                ServiceError::Validation(format!("unknown status: {s}"))
            })?),
            None => None,
        };
        let needle = query.q.as_ref().map(|q| q.to_lowercase());

        let machines: Vec<Machine> = self
            .store
            .list()?
            .into_iter()
            .filter(|m| status.is_none_or(|s| m.status == s))
            .filter(|m| {
                needle.as_ref().is_none_or(|n| {
                    m.id.to_lowercase().contains(n) || m.model.to_lowercase().contains(n)
                })
            })
            .collect();

        let total = machines.len();
        let items = machines.into_iter().skip(offset).take(limit).collect();

        Ok(ListResult { items, total })
    }

    /// Per-status counts across the whole fleet.
    pub fn fleet_stats(&self) -> Result<FleetStats, ServiceError> {
        let mut stats = FleetStats::default();
        for machine in self.store.list()? {
            stats.total += 1;
            match machine.status {
                MachineStatus::Available => stats.available += 1,
                MachineStatus::Reserved => stats.reserved += 1,
                MachineStatus::Dispatched => stats.dispatched += 1,
                MachineStatus::Delivered => stats.delivered += 1,
                MachineStatus::Rented => stats.rented += 1,
                MachineStatus::InRepair => stats.in_repair += 1,
                MachineStatus::Retired => stats.retired += 1,
            }
        }
        Ok(stats)
    }
}
