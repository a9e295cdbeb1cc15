use crate::error::KVError;

/// KVStore provides a key-value storage interface with namespaced keys.
///
/// Keys follow a namespaced convention: `fleet:machine:MSN-501`,
/// `audit:entry:2026-03-01T...`, etc. Values are opaque byte slices;
/// callers handle serialization.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any existing value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    /// Atomically replace the value for a key, but only if the stored value
    /// still equals `expected` (`None` = key must be absent).
    ///
    /// Returns `true` if the swap was applied, `false` if the stored value
    /// no longer matched and nothing was written. The read-compare-write
    /// runs inside a single write transaction.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: &[u8],
    ) -> Result<bool, KVError>;
}
