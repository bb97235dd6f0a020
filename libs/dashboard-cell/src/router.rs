// libs/dashboard-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::DashboardState;

/// Dashboard view, tab selection, data refresh and call control.
pub fn dashboard_routes(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(get_dashboard))
        .route("/tabs/{tab}", put(select_tab))
        .route("/refresh", post(refresh_dashboard))
        // Consultation calls
        .route("/consultations/book", post(book_consultation))
        .route("/consultations/{consultation_id}/join", post(join_consultation))
        .route("/call", get(get_call).delete(hang_up_call))
        .route("/call/events", post(report_call_event))
        .with_state(state)
}

/// Static marketing page.
pub fn features_routes(state: Arc<DashboardState>) -> Router {
    Router::new()
        .route("/", get(get_features))
        .with_state(state)
}
