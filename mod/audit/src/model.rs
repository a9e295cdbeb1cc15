use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// What kind of event an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A machine's operational status was changed.
    UpdateStatus,
    /// A unit was dispatched to a customer site.
    DispatchUnit,
    /// Server-generated event (startup, seeding, ...).
    SystemLog,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateStatus => "UPDATE_STATUS",
            Self::DispatchUnit => "DISPATCH_UNIT",
            Self::SystemLog => "SYSTEM_LOG",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "UPDATE_STATUS" => Some(Self::UpdateStatus),
            "DISPATCH_UNIT" => Some(Self::DispatchUnit),
            "SYSTEM_LOG" => Some(Self::SystemLog),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditEntry
// ---------------------------------------------------------------------------

/// A single append-only audit record. Entries are never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,

    /// Event timestamp (RFC 3339).
    pub ts: String,

    /// Who performed the action, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    pub action: AuditAction,

    /// Machine this entry concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,

    /// Human-readable description, e.g. `"AVAILABLE -> RENTED"`.
    pub detail: String,
}

impl AuditEntry {
    pub fn new(
        action: AuditAction,
        actor: Option<&str>,
        machine_id: Option<&str>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: generp_core::new_id(),
            ts: generp_core::now_rfc3339(),
            actor: actor.map(String::from),
            action,
            machine_id: machine_id.map(String::from),
            detail: detail.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// API query types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /audit/entries`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditListQuery {
    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub machine_id: Option<String>,
}
