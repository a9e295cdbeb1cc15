//! Status authority — the pure decision function for status transitions.
//!
//! No I/O, no clock, no side effects: `(current, requested)` in, verdict
//! out. The service layer owns loading and persisting.

use thiserror::Error;

use crate::model::MachineStatus;

/// Rejection of a requested status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("illegal status transition: {from} -> {to}")]
    Illegal {
        from: MachineStatus,
        to: MachineStatus,
    },
}

/// Statuses reachable from `from` in one step, excluding the identity.
///
/// Rental flow: AVAILABLE → RESERVED → DISPATCHED → DELIVERED → RENTED.
/// A rented unit must pass the IN_REPAIR inspection checkpoint before it
/// becomes AVAILABLE again, and a unit under repair is never handed straight
/// to a customer. RETIRED is terminal.
pub fn allowed_targets(from: MachineStatus) -> &'static [MachineStatus] {
    use MachineStatus::*;
    match from {
        Available => &[Reserved, Rented, InRepair, Retired],
        Reserved => &[Available, Dispatched, Rented, InRepair],
        Dispatched => &[Delivered, Available],
        Delivered => &[Rented, InRepair],
        Rented => &[InRepair],
        InRepair => &[Available, Retired],
        Retired => &[],
    }
}

/// Decide whether `requested` is reachable from `current`.
///
/// Self-transitions are always legal so that repeating a request is
/// idempotent. On success the returned status equals `requested`; nothing
/// else about the machine is decided here.
pub fn attempt_transition(
    current: MachineStatus,
    requested: MachineStatus,
) -> Result<MachineStatus, TransitionError> {
    if current == requested || allowed_targets(current).contains(&requested) {
        Ok(requested)
    } else {
        Err(TransitionError::Illegal {
            from: current,
            to: requested,
        })
    }
}
