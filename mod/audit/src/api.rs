use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use generp_core::ServiceError;

use crate::model::AuditListQuery;
use crate::store::AuditStore;

type StoreState = Arc<AuditStore>;

pub fn router(store: Arc<AuditStore>) -> Router {
    Router::new()
        .route("/entries", get(list_entries))
        .with_state(store)
}

// ---------------------------------------------------------------------------
// GET /entries
// ---------------------------------------------------------------------------

async fn list_entries(
    State(store): State<StoreState>,
    Query(query): Query<AuditListQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = store.list(&query)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}
