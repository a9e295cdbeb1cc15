use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// RedbStore is a KVStore implementation backed by redb — a pure-Rust
/// embedded key-value database. Write transactions are serialized by redb,
/// which is what makes `compare_and_swap` atomic.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(|e| KVError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;

        debug!("opened redb database at {}", path.display());
        Ok(Self { db: Arc::new(db) })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        match table.get(key) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(KVError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;
            table
                .remove(key)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(())
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        let iter = table
            .range(prefix..)
            .map_err(|e| KVError::Storage(e.to_string()))?;

        for entry in iter {
            let entry = entry.map_err(|e| KVError::Storage(e.to_string()))?;
            let key = entry.0.value().to_string();
            if !key.starts_with(prefix) {
                break;
            }
            let value = entry.1.value().to_vec();
            results.push((key, value));
        }

        Ok(results)
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, KVError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| KVError::Storage(e.to_string()))?;

            let matches = {
                let current = table
                    .get(key)
                    .map_err(|e| KVError::Storage(e.to_string()))?;
                match (&current, expected) {
                    (Some(cur), Some(exp)) => cur.value() == exp,
                    (None, None) => true,
                    _ => false,
                }
            };
            if !matches {
                // Dropping the uncommitted transaction aborts it.
                return Ok(false);
            }

            table
                .insert(key, value)
                .map_err(|e| KVError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| KVError::Storage(e.to_string()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn set_get_delete() {
        let (store, _dir) = open_store();
        assert!(store.get("a").unwrap().is_none());

        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap().unwrap(), b"1");

        store.delete("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
    }

    #[test]
    fn scan_prefix() {
        let (store, _dir) = open_store();
        store.set("fleet:machine:MSN-1", b"a").unwrap();
        store.set("fleet:machine:MSN-2", b"b").unwrap();
        store.set("audit:entry:x", b"c").unwrap();

        let results = store.scan("fleet:machine:").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "fleet:machine:MSN-1");
        assert_eq!(results[1].0, "fleet:machine:MSN-2");
    }

    #[test]
    fn cas_applies_on_match() {
        let (store, _dir) = open_store();
        store.set("k", b"v1").unwrap();

        assert!(store.compare_and_swap("k", Some(b"v1"), b"v2").unwrap());
        assert_eq!(store.get("k").unwrap().unwrap(), b"v2");
    }

    #[test]
    fn cas_rejects_on_mismatch() {
        let (store, _dir) = open_store();
        store.set("k", b"v1").unwrap();

        assert!(!store.compare_and_swap("k", Some(b"stale"), b"v2").unwrap());
        assert_eq!(store.get("k").unwrap().unwrap(), b"v1");
    }

    #[test]
    fn cas_absent_key() {
        let (store, _dir) = open_store();

        // Expected-absent succeeds only while the key is missing.
        assert!(store.compare_and_swap("k", None, b"v1").unwrap());
        assert!(!store.compare_and_swap("k", None, b"v2").unwrap());
        assert_eq!(store.get("k").unwrap().unwrap(), b"v1");

        // Expecting a value on a missing key fails.
        assert!(!store.compare_and_swap("gone", Some(b"x"), b"y").unwrap());
        assert!(store.get("gone").unwrap().is_none());
    }
}
