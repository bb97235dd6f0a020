// libs/dashboard-cell/src/services/fetcher.rs
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use shared_backend::{BackendClient, BackendError};
use shared_utils::storage::{read_token, LocalStorage};

use crate::models::{Consultation, Doctor, FetchStatus, LoadReport, ViewState};

pub const CONSULTATIONS_PATH: &str = "/api/consultations";
pub const DOCTORS_PATH: &str = "/api/users/doctors";

/// Loads the dashboard collections from the backend.
/// One best-effort pass per call: no retry, no caching.
pub struct RemoteDataFetcher {
    backend: BackendClient,
    storage: Arc<dyn LocalStorage>,
}

impl RemoteDataFetcher {
    pub fn new(backend: BackendClient, storage: Arc<dyn LocalStorage>) -> Self {
        Self { backend, storage }
    }

    /// Refreshes both collections in `state`. Each request applies its own
    /// result when it completes; a failure leaves that collection as it was.
    pub async fn load_dashboard_data(&self, state: &RwLock<ViewState>) -> LoadReport {
        let Some(token) = read_token(self.storage.as_ref()) else {
            warn!("No auth token found. User needs to be logged in to fetch data.");
            return LoadReport::skipped();
        };

        let consultations = async {
            match self.fetch::<Vec<Consultation>>(CONSULTATIONS_PATH, &token).await {
                Ok(items) => {
                    let count = items.len();
                    state.write().await.consultations = items;
                    info!("Loaded {} consultations", count);
                    FetchStatus::Updated { count }
                }
                Err(e) => Self::failure("consultations", e),
            }
        };

        let doctors = async {
            match self.fetch::<Vec<Doctor>>(DOCTORS_PATH, &token).await {
                Ok(items) => {
                    let count = items.len();
                    state.write().await.doctors = items;
                    info!("Loaded {} doctors", count);
                    FetchStatus::Updated { count }
                }
                Err(e) => Self::failure("doctors", e),
            }
        };

        let (consultations, doctors) = tokio::join!(consultations, doctors);

        LoadReport {
            consultations,
            doctors,
        }
    }

    async fn fetch<T>(&self, path: &str, token: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        self.backend.get_json(path, token).await
    }

    fn failure(collection: &str, err: BackendError) -> FetchStatus {
        if err.is_status() {
            error!("Failed to fetch {}: {}", collection, err);
            FetchStatus::Rejected {
                message: err.to_string(),
            }
        } else {
            error!("Error fetching {}: {}", collection, err);
            FetchStatus::Failed {
                message: err.to_string(),
            }
        }
    }
}
