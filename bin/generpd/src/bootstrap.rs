//! Bootstrap — first-start checks and fleet seeding.
//!
//! When generpd starts:
//! 1. Verify the config points at a usable data directory.
//! 2. Optionally load a machine seed file. Seeding only inserts ids that
//!    are absent; live records are never overwritten.

use std::path::Path;

use tracing::info;

use generp_audit::{AuditAction, AuditEntry, AuditSink};
use generp_core::now_rfc3339;
use generp_fleet::{Machine, MachineStore};

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}

/// Load machines from a JSON seed file into the store.
///
/// Returns the number of machines inserted.
pub fn seed_machines(
    store: &dyn MachineStore,
    audit: &dyn AuditSink,
    path: &Path,
) -> anyhow::Result<u32> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read seed file {}: {e}", path.display()))?;
    let machines: Vec<Machine> = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("cannot parse seed file {}: {e}", path.display()))?;

    let mut inserted = 0u32;
    for mut machine in machines {
        if machine.id.is_empty() {
            anyhow::bail!("seed file {} contains a machine without id", path.display());
        }
        if store.get(&machine.id)?.is_some() {
            continue;
        }
        if machine.version == 0 {
            machine.version = 1;
        }
        if machine.create_at.is_none() {
            machine.create_at = Some(now_rfc3339());
        }
        store.put(&machine)?;
        inserted += 1;
    }

    if inserted > 0 {
        info!(count = inserted, "seeded machines from {}", path.display());
        let entry = AuditEntry::new(
            AuditAction::SystemLog,
            None,
            None,
            format!("seeded {inserted} machines"),
        );
        audit.record(&entry)?;
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use generp_audit::NullSink;
    use generp_fleet::{KvMachineStore, MachineStatus};
    use generp_kv::RedbStore;

    const SEED: &str = r#"[
        {"id": "MSN-501", "model": "Genset Perkins", "capacity": "50kVA", "location": "Gudang Utama"},
        {"id": "MSN-101", "model": "Genset Cummins", "capacity": "100kVA", "status": "IN_REPAIR", "location": "Bengkel Pusat"}
    ]"#;

    fn test_store() -> (KvMachineStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let kv = Arc::new(RedbStore::open(&dir.path().join("kv.redb")).unwrap());
        (KvMachineStore::new(kv), dir)
    }

    #[test]
    fn seed_inserts_and_normalizes() {
        let (store, dir) = test_store();
        let seed_path = dir.path().join("machines.json");
        std::fs::write(&seed_path, SEED).unwrap();

        let inserted = seed_machines(&store, &NullSink, &seed_path).unwrap();
        assert_eq!(inserted, 2);

        let perkins = store.get("MSN-501").unwrap().unwrap();
        assert_eq!(perkins.status, MachineStatus::Available);
        assert_eq!(perkins.version, 1);
        assert!(perkins.create_at.is_some());

        let cummins = store.get("MSN-101").unwrap().unwrap();
        assert_eq!(cummins.status, MachineStatus::InRepair);
    }

    #[test]
    fn seed_never_overwrites() {
        let (store, dir) = test_store();
        let seed_path = dir.path().join("machines.json");
        std::fs::write(&seed_path, SEED).unwrap();

        seed_machines(&store, &NullSink, &seed_path).unwrap();

        // Mutate a record, then re-seed: the live record must survive.
        let mut machine = store.get("MSN-501").unwrap().unwrap();
        machine.status = MachineStatus::Rented;
        machine.version = 2;
        store.put(&machine).unwrap();

        let inserted = seed_machines(&store, &NullSink, &seed_path).unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(
            store.get("MSN-501").unwrap().unwrap().status,
            MachineStatus::Rented
        );
    }

    #[test]
    fn seed_rejects_missing_id() {
        let (store, dir) = test_store();
        let seed_path = dir.path().join("machines.json");
        std::fs::write(&seed_path, r#"[{"id": "", "model": "x"}]"#).unwrap();

        assert!(seed_machines(&store, &NullSink, &seed_path).is_err());
    }
}
