// libs/dashboard-cell/src/lib.rs
//! # Dashboard Cell
//!
//! Patient dashboard and features page for the NIRAMYA portal.
//!
//! The cell keeps the dashboard view state (active tab, consultations,
//! doctors), loads it from the backend with the stored bearer credential,
//! and starts or ends consultation calls through the video conferencing
//! cell.
//!
//! ## API Endpoints
//!
//! ### Dashboard
//! - `GET /dashboard` - Current view for the active tab
//! - `PUT /dashboard/tabs/{tab}` - Switch tab
//! - `POST /dashboard/refresh` - Reload consultations and doctors
//!
//! ### Consultation Calls
//! - `POST /dashboard/consultations/book` - Start a call in a fresh room
//! - `POST /dashboard/consultations/{id}/join` - Join a scheduled consultation
//! - `GET /dashboard/call` - Call phase and embed descriptor
//! - `POST /dashboard/call/events` - Widget event from the browser shell
//! - `DELETE /dashboard/call` - Hang up
//!
//! ### Marketing
//! - `GET /features` - Features page content

use std::sync::Arc;

use shared_config::AppConfig;
use shared_utils::storage::LocalStorage;
use video_conferencing_cell::services::SessionWidgetAdapter;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    CallView, Consultation, DashboardError, DashboardView, Doctor, FetchStatus, LoadReport, Tab,
    TabPanel,
};
pub use router::{dashboard_routes, features_routes};
pub use services::{DashboardController, RemoteDataFetcher};

/// Shared state behind the dashboard and features routes.
pub struct DashboardState {
    pub config: Arc<AppConfig>,
    pub controller: DashboardController,
}

impl DashboardState {
    pub fn new(
        config: Arc<AppConfig>,
        storage: Arc<dyn LocalStorage>,
        calls: Arc<SessionWidgetAdapter>,
    ) -> Self {
        let controller = DashboardController::new(Arc::clone(&config), storage, calls);
        Self { config, controller }
    }
}
