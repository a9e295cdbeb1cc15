use std::sync::Arc;

use generp_core::{ListResult, ServiceError};
use generp_kv::KVStore;

use crate::model::{AuditAction, AuditEntry, AuditListQuery};
use crate::sink::AuditSink;

const PREFIX: &str = "audit:entry:";

/// Append-only audit storage over the KV layer.
///
/// Keys are `audit:entry:{ts}:{id}` — RFC 3339 timestamps in UTC sort
/// lexicographically, so a prefix scan returns entries in time order.
pub struct AuditStore {
    kv: Arc<dyn KVStore>,
}

impl AuditStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn entry_key(entry: &AuditEntry) -> String {
        format!("{PREFIX}{}:{}", entry.ts, entry.id)
    }

    /// Append one entry.
    pub fn append(&self, entry: &AuditEntry) -> Result<(), ServiceError> {
        let data =
            serde_json::to_vec(entry).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.kv
            .set(&Self::entry_key(entry), &data)
            .map_err(|e| ServiceError::Storage(e.to_string()))
    }

    /// List entries, newest first, with optional filters.
    pub fn list(&self, query: &AuditListQuery) -> Result<ListResult<AuditEntry>, ServiceError> {
        let limit = query.limit.unwrap_or(100);
        let action = match &query.action {
            Some(s) => Some(AuditAction::from_str(s).ok_or_else(|| {
                ServiceError::Validation(format!("unknown audit action: {s}"))
            })?),
            None => None,
        };

        let pairs = self
            .kv
            .scan(PREFIX)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut entries: Vec<AuditEntry> = Vec::new();
        for (key, value) in pairs {
            let entry: AuditEntry = serde_json::from_slice(&value)
                .map_err(|e| ServiceError::Storage(format!("bad audit entry {key}: {e}")))?;
            if let Some(a) = action {
                if entry.action != a {
                    continue;
                }
            }
            if let Some(ref mid) = query.machine_id {
                if entry.machine_id.as_deref() != Some(mid.as_str()) {
                    continue;
                }
            }
            entries.push(entry);
        }

        let total = entries.len();
        entries.reverse();
        entries.truncate(limit);

        Ok(ListResult {
            items: entries,
            total,
        })
    }
}

impl AuditSink for AuditStore {
    fn record(&self, entry: &AuditEntry) -> Result<(), ServiceError> {
        self.append(entry)
    }
}
