use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MachineStatus
// ---------------------------------------------------------------------------

/// Operational status of a machine. Every machine has exactly one.
///
/// ```text
/// AVAILABLE → RESERVED → DISPATCHED → DELIVERED → RENTED
///     ↑            ↓           ↓           ↓         ↓
///     └──────── IN_REPAIR ←────────────────────────┘
///                   ↓
///               RETIRED (terminal)
/// ```
///
/// The full transition table lives in [`crate::authority`]. RENTED never
/// goes straight back to AVAILABLE — a returned unit passes through the
/// IN_REPAIR inspection checkpoint first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    Available,
    Reserved,
    Dispatched,
    Delivered,
    Rented,
    InRepair,
    Retired,
}

impl Default for MachineStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl MachineStatus {
    pub const ALL: [MachineStatus; 7] = [
        Self::Available,
        Self::Reserved,
        Self::Dispatched,
        Self::Delivered,
        Self::Rented,
        Self::InRepair,
        Self::Retired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Dispatched => "DISPATCHED",
            Self::Delivered => "DELIVERED",
            Self::Rented => "RENTED",
            Self::InRepair => "IN_REPAIR",
            Self::Retired => "RETIRED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(Self::Available),
            "RESERVED" => Some(Self::Reserved),
            "DISPATCHED" => Some(Self::Dispatched),
            "DELIVERED" => Some(Self::Delivered),
            "RENTED" => Some(Self::Rented),
            "IN_REPAIR" => Some(Self::InRepair),
            "RETIRED" => Some(Self::Retired),
            _ => None,
        }
    }

    /// Whether the machine has left the fleet for good.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Retired)
    }
}

impl std::fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Machine — the core data model
// ---------------------------------------------------------------------------

/// A rentable physical unit (generator, compressor, ...) tracked by unique
/// id and operational status.
///
/// `id` is assigned at creation and never reused or mutated. `version` is
/// bumped on every write and drives the optimistic-concurrency check in the
/// store; clients treat it as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,

    /// Model / specification descriptor, e.g. `"Genset Perkins"`.
    pub model: String,

    /// Power rating, e.g. `"50kVA"`.
    #[serde(default)]
    pub capacity: String,

    #[serde(default)]
    pub status: MachineStatus,

    /// Current placement, e.g. `"Gudang Utama"` or a customer site.
    #[serde(default)]
    pub location: String,

    /// Date of the last service (RFC 3339 date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_service: Option<String>,

    /// Customer / order this unit is currently assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,

    /// Write counter for optimistic concurrency.
    #[serde(default)]
    pub version: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

// ---------------------------------------------------------------------------
// API request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /fleet/machines/{id}/@status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    /// Requested status, e.g. `"RENTED"`.
    pub status: String,

    /// Who is making the change (recorded in the audit log).
    #[serde(default)]
    pub actor: Option<String>,
}

/// Query parameters for `GET /fleet/machines`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineListQuery {
    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub offset: Option<usize>,

    /// Filter by exact status, e.g. `"AVAILABLE"`.
    #[serde(default)]
    pub status: Option<String>,

    /// Case-insensitive substring match on id or model.
    #[serde(default)]
    pub q: Option<String>,
}

/// Per-status fleet counts for the dashboard header cards.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
    pub dispatched: usize,
    pub delivered: usize,
    pub rented: usize,
    pub in_repair: usize,
    pub retired: usize,
}
