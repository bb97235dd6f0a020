use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use dashboard_cell::{dashboard_routes, features_routes, DashboardState};

pub fn create_router(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(|| async { "NIRAMYA patient portal is running!" }))
        .route("/health", get(health))
        .nest("/dashboard", dashboard_routes(state.clone()))
        .nest("/features", features_routes(state))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "niramya-portal"
    }))
}
