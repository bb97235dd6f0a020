// libs/dashboard-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::error::AppError;
use video_conferencing_cell::models::{VideoConferencingError, WidgetEvent};

use crate::models::{CallView, DashboardError, DashboardView, FeaturesPage, LoadReport, Tab};
use crate::services::features_page;
use crate::DashboardState;

// ==============================================================================
// REQUEST BODIES
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct WidgetEventRequest {
    pub event: WidgetEvent,
}

fn map_dashboard_error(e: DashboardError) -> AppError {
    match e {
        DashboardError::ConsultationNotFound { id } => {
            AppError::NotFound(format!("Consultation {} not found", id))
        }
        DashboardError::NotJoinable { .. } => AppError::Conflict(e.to_string()),
        DashboardError::Video(VideoConferencingError::InvalidRoom) => {
            AppError::BadRequest("Room identifier must not be empty".to_string())
        }
        DashboardError::Video(
            err @ (VideoConferencingError::ScriptLoad { .. }
            | VideoConferencingError::WidgetUnavailable { .. }),
        ) => AppError::ExternalService(err.to_string()),
        DashboardError::Video(VideoConferencingError::NotConfigured) => {
            AppError::Internal("Video conferencing not configured".to_string())
        }
        DashboardError::Video(err) => AppError::Internal(err.to_string()),
    }
}

// ==============================================================================
// DASHBOARD HANDLERS
// ==============================================================================

pub async fn get_dashboard(State(state): State<Arc<DashboardState>>) -> Json<DashboardView> {
    Json(state.controller.view().await)
}

pub async fn select_tab(
    State(state): State<Arc<DashboardState>>,
    Path(tab): Path<Tab>,
) -> Json<DashboardView> {
    state.controller.select_tab(tab).await;
    Json(state.controller.view().await)
}

pub async fn refresh_dashboard(State(state): State<Arc<DashboardState>>) -> Json<LoadReport> {
    Json(state.controller.load_dashboard_data().await)
}

// ==============================================================================
// CALL HANDLERS
// ==============================================================================

pub async fn book_consultation(
    State(state): State<Arc<DashboardState>>,
) -> Result<Json<Value>, AppError> {
    let outcome = state
        .controller
        .book_consultation()
        .await
        .map_err(map_dashboard_error)?;

    Ok(Json(json!({
        "result": outcome,
        "call": state.controller.call_view().await,
    })))
}

pub async fn join_consultation(
    State(state): State<Arc<DashboardState>>,
    Path(consultation_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let outcome = state
        .controller
        .join_consultation_by_id(&consultation_id)
        .await
        .map_err(map_dashboard_error)?;

    Ok(Json(json!({
        "result": outcome,
        "call": state.controller.call_view().await,
    })))
}

pub async fn get_call(State(state): State<Arc<DashboardState>>) -> Json<CallView> {
    Json(state.controller.call_view().await)
}

pub async fn report_call_event(
    State(state): State<Arc<DashboardState>>,
    Json(request): Json<WidgetEventRequest>,
) -> Json<Value> {
    let fired = state
        .controller
        .calls()
        .dispatch_widget_event(request.event)
        .await;

    Json(json!({
        "event": request.event,
        "listeners_fired": fired,
        "call": state.controller.call_view().await,
    }))
}

pub async fn hang_up_call(State(state): State<Arc<DashboardState>>) -> Json<CallView> {
    state.controller.hang_up().await;
    Json(state.controller.call_view().await)
}

// ==============================================================================
// FEATURES PAGE
// ==============================================================================

pub async fn get_features(State(state): State<Arc<DashboardState>>) -> Json<FeaturesPage> {
    Json(features_page(&state.config))
}
