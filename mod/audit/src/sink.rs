use generp_core::ServiceError;

use crate::model::AuditEntry;

/// Receiver for audit events emitted by other modules.
///
/// Implementations must be cheap and non-blocking from the caller's point
/// of view; a failed `record` must never undo the business operation that
/// produced the entry (the caller logs and moves on).
pub trait AuditSink: Send + Sync {
    /// Append one entry.
    fn record(&self, entry: &AuditEntry) -> Result<(), ServiceError>;
}

/// Sink that discards every entry. Used in tests and when auditing is
/// disabled.
pub struct NullSink;

impl AuditSink for NullSink {
    fn record(&self, _entry: &AuditEntry) -> Result<(), ServiceError> {
        Ok(())
    }
}
