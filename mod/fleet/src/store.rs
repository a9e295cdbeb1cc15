use std::sync::Arc;

use generp_core::ServiceError;
use generp_kv::KVStore;

use crate::model::Machine;

const PREFIX: &str = "fleet:machine:";

/// Durable keyed storage for machine records.
///
/// An injected dependency of the service layer — never a process-wide
/// singleton. Point reads are plain; writes race only through
/// `update_checked`, which is the optimistic-concurrency gate.
pub trait MachineStore: Send + Sync {
    /// Point read by id. Returns None if the id is unknown.
    fn get(&self, id: &str) -> Result<Option<Machine>, ServiceError>;

    /// Unconditional write. Used for seeding; live mutations go through
    /// `update_checked`.
    fn put(&self, machine: &Machine) -> Result<(), ServiceError>;

    /// Write `machine` only if the stored record still carries
    /// `expected_version`. Returns `false` without writing when another
    /// writer got there first (or the record vanished).
    fn update_checked(
        &self,
        machine: &Machine,
        expected_version: u64,
    ) -> Result<bool, ServiceError>;

    /// All machines, ordered by id.
    fn list(&self) -> Result<Vec<Machine>, ServiceError>;
}

/// MachineStore over the KV layer: one `fleet:machine:{id}` key per record,
/// JSON values.
pub struct KvMachineStore {
    kv: Arc<dyn KVStore>,
}

impl KvMachineStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn machine_key(id: &str) -> String {
        format!("{PREFIX}{id}")
    }

    fn decode(key: &str, bytes: &[u8]) -> Result<Machine, ServiceError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ServiceError::Storage(format!("bad machine record {key}: {e}")))
    }
}

impl MachineStore for KvMachineStore {
    fn get(&self, id: &str) -> Result<Option<Machine>, ServiceError> {
        let key = Self::machine_key(id);
        match self
            .kv
            .get(&key)
            .map_err(|e| ServiceError::Storage(e.to_string()))?
        {
            Some(bytes) => Ok(Some(Self::decode(&key, &bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, machine: &Machine) -> Result<(), ServiceError> {
        let data =
            serde_json::to_vec(machine).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.kv
            .set(&Self::machine_key(&machine.id), &data)
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    fn update_checked(
        &self,
        machine: &Machine,
        expected_version: u64,
    ) -> Result<bool, ServiceError> {
        let key = Self::machine_key(&machine.id);

        let Some(current_bytes) = self
            .kv
            .get(&key)
            .map_err(|e| ServiceError::Storage(e.to_string()))?
        else {
            return Ok(false);
        };
        let current = Self::decode(&key, &current_bytes)?;
        if current.version != expected_version {
            return Ok(false);
        }

        let data =
            serde_json::to_vec(machine).map_err(|e| ServiceError::Internal(e.to_string()))?;

        // The byte-level CAS re-checks under the write transaction, so a
        // writer that slipped in between the read above and here still loses.
        self.kv
            .compare_and_swap(&key, Some(&current_bytes), &data)
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    fn list(&self) -> Result<Vec<Machine>, ServiceError> {
        let pairs = self
            .kv
            .scan(PREFIX)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        pairs
            .iter()
            .map(|(key, bytes)| Self::decode(key, bytes))
            .collect()
    }
}
