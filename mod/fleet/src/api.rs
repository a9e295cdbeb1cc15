use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use generp_core::ServiceError;

use crate::model::{ChangeStatusRequest, FleetStats, Machine, MachineListQuery, MachineStatus};
use crate::service::FleetService;

type ServiceState = Arc<FleetService>;

pub fn router(service: Arc<FleetService>) -> Router {
    Router::new()
        .route("/machines", get(list_machines))
        .route("/machines/{id}", get(get_machine))
        .route("/machines/{id}/@status", post(change_status))
        .route("/stats", get(fleet_stats))
        .with_state(service)
}

// ---------------------------------------------------------------------------
// GET /machines
// ---------------------------------------------------------------------------

async fn list_machines(
    State(service): State<ServiceState>,
    Query(query): Query<MachineListQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = service.list_machines(&query)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

// ---------------------------------------------------------------------------
// GET /machines/:id
// ---------------------------------------------------------------------------

async fn get_machine(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<Machine>, ServiceError> {
    let machine = service.get_machine(&id)?;
    Ok(Json(machine))
}

// ---------------------------------------------------------------------------
// POST /machines/:id/@status
// ---------------------------------------------------------------------------

async fn change_status(
    State(service): State<ServiceState>,
    Path(id): Path<String>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<Machine>, ServiceError> {
    let requested = MachineStatus::from_str(&req.status)
        .ok_or_else(|| ServiceError::Validation(format!("unknown status: {}", req.status)))?;
    let machine = service.change_status(&id, requested, req.actor.as_deref())?;
    Ok(Json(machine))
}

// ---------------------------------------------------------------------------
// GET /stats
// ---------------------------------------------------------------------------

async fn fleet_stats(
    State(service): State<ServiceState>,
) -> Result<Json<FleetStats>, ServiceError> {
    let stats = service.fleet_stats()?;
    Ok(Json(stats))
}
