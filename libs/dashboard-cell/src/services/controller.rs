// libs/dashboard-cell/src/services/controller.rs
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use shared_backend::BackendClient;
use shared_config::AppConfig;
use shared_models::auth::UserProfile;
use shared_utils::storage::{read_user, LocalStorage};
use video_conferencing_cell::models::StartOutcome;
use video_conferencing_cell::services::SessionWidgetAdapter;

use crate::models::{
    ActionTarget, CallView, Consultation, ConsultationCard, ConsultationsPanel, DashboardError,
    DashboardView, Doctor, DoctorCard, LoadReport, OverviewPanel, PharmacyPanel,
    PlaceholderPanel, QuickAction, RecentActivity, SettingsPanel, StatTile, Tab, TabEntry,
    TabPanel, ViewState, STATUS_COMPLETED,
};
use crate::services::fetcher::RemoteDataFetcher;

pub const ROOM_PREFIX: &str = "NiramyaConsultation_";
pub const DOCTOR_PREVIEW_LIMIT: usize = 6;
pub const DOCTOR_SPECIALTY: &str = "General Medicine";
pub const UNKNOWN_DOCTOR: &str = "Unknown";
pub const HEALTH_RECORD_COUNT: usize = 12;
pub const UNREAD_MESSAGE_COUNT: usize = 5;

const RECENT_ACTIVITY: [RecentActivity; 4] = [
    RecentActivity {
        kind: "consultation",
        message: "Video consultation with Dr. Sharma completed",
        time: "2 hours ago",
    },
    RecentActivity {
        kind: "prescription",
        message: "New prescription added to your records",
        time: "1 day ago",
    },
    RecentActivity {
        kind: "appointment",
        message: "Appointment scheduled for tomorrow",
        time: "2 days ago",
    },
    RecentActivity {
        kind: "message",
        message: "New message from Dr. Patel",
        time: "3 days ago",
    },
];

/// Room for a consultation: the same consultation always lands in the same room.
pub fn consultation_room(consultation: &Consultation) -> String {
    format!("{}{}", ROOM_PREFIX, consultation.id)
}

/// Consultations scheduled strictly after `now`, whatever their status.
pub fn upcoming_count(consultations: &[Consultation], now: DateTime<Utc>) -> usize {
    consultations.iter().filter(|c| c.is_upcoming(now)).count()
}

pub fn dashboard_stats(consultations: &[Consultation], now: DateTime<Utc>) -> Vec<StatTile> {
    vec![
        StatTile {
            name: "Total Consultations",
            value: consultations.len(),
        },
        StatTile {
            name: "Upcoming Appointments",
            value: upcoming_count(consultations, now),
        },
        StatTile {
            name: "Health Records",
            value: HEALTH_RECORD_COUNT,
        },
        StatTile {
            name: "Messages",
            value: UNREAD_MESSAGE_COUNT,
        },
    ]
}

/// View state controller for the patient dashboard.
///
/// Owns the tab selection and the fetched collections, and drives the call
/// adapter for book/join/hang-up. Derived values are computed per view and
/// never stored.
pub struct DashboardController {
    config: Arc<AppConfig>,
    storage: Arc<dyn LocalStorage>,
    fetcher: RemoteDataFetcher,
    calls: Arc<SessionWidgetAdapter>,
    state: RwLock<ViewState>,
    last_room_stamp: AtomicI64,
}

impl DashboardController {
    pub fn new(
        config: Arc<AppConfig>,
        storage: Arc<dyn LocalStorage>,
        calls: Arc<SessionWidgetAdapter>,
    ) -> Self {
        let fetcher = RemoteDataFetcher::new(BackendClient::new(&config), Arc::clone(&storage));

        Self {
            config,
            storage,
            fetcher,
            calls,
            state: RwLock::new(ViewState::default()),
            last_room_stamp: AtomicI64::new(0),
        }
    }

    pub fn calls(&self) -> &SessionWidgetAdapter {
        &self.calls
    }

    pub async fn load_dashboard_data(&self) -> LoadReport {
        self.fetcher.load_dashboard_data(&self.state).await
    }

    pub async fn active_tab(&self) -> Tab {
        self.state.read().await.active_tab
    }

    pub async fn select_tab(&self, tab: Tab) {
        debug!("Selecting tab {:?}", tab);
        self.state.write().await.active_tab = tab;
    }

    pub async fn consultations(&self) -> Vec<Consultation> {
        self.state.read().await.consultations.clone()
    }

    pub async fn doctors(&self) -> Vec<Doctor> {
        self.state.read().await.doctors.clone()
    }

    /// Fresh room for an ad-hoc booking. The millisecond stamp never repeats
    /// within the process, even for calls in the same millisecond.
    pub fn next_booking_room(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_room_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        format!("{}{}", ROOM_PREFIX, now.max(previous + 1))
    }

    #[instrument(skip(self))]
    pub async fn book_consultation(&self) -> Result<StartOutcome, DashboardError> {
        let room = self.next_booking_room();
        info!("Booking consultation in room {}", room);
        self.start_call(&room).await
    }

    #[instrument(skip(self, consultation), fields(consultation_id = %consultation.id))]
    pub async fn join_consultation(
        &self,
        consultation: &Consultation,
    ) -> Result<StartOutcome, DashboardError> {
        if !consultation.is_scheduled() {
            return Err(DashboardError::NotJoinable {
                id: consultation.id.clone(),
                status: consultation.status.clone(),
            });
        }

        let room = consultation_room(consultation);
        info!("Joining consultation {} in room {}", consultation.id, room);
        self.start_call(&room).await
    }

    pub async fn join_consultation_by_id(&self, id: &str) -> Result<StartOutcome, DashboardError> {
        let consultation = self
            .state
            .read()
            .await
            .consultations
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| DashboardError::ConsultationNotFound { id: id.to_string() })?;

        self.join_consultation(&consultation).await
    }

    pub async fn hang_up(&self) {
        self.calls.hang_up().await;
    }

    pub async fn call_view(&self) -> CallView {
        let phase = self.calls.phase().await;
        CallView {
            phase,
            in_call: phase.is_in_call(),
            embed: self.calls.embed().await,
        }
    }

    pub async fn view(&self) -> DashboardView {
        self.view_at(Utc::now()).await
    }

    /// Renders the dashboard as of `now`.
    pub async fn view_at(&self, now: DateTime<Utc>) -> DashboardView {
        let user = self.user();
        let call = self.call_view().await;

        let state = self.state.read().await;
        let active_tab = state.active_tab;

        let tabs = Tab::ALL
            .iter()
            .map(|tab| TabEntry {
                id: *tab,
                name: tab.label(),
                active: *tab == active_tab,
            })
            .collect();

        let panel = match active_tab {
            Tab::Overview => TabPanel::Overview(OverviewPanel {
                stats: dashboard_stats(&state.consultations, now),
                quick_actions: vec![
                    QuickAction {
                        label: "Book Consultation",
                        target: ActionTarget::BookConsultation,
                    },
                    self.find_medicine_action(),
                    QuickAction {
                        label: "Emergency Call",
                        target: ActionTarget::Navigate {
                            url: self.config.emergency_dial_url.clone(),
                        },
                    },
                ],
                recent_activity: RECENT_ACTIVITY.to_vec(),
            }),
            Tab::Consultations => TabPanel::Consultations(ConsultationsPanel {
                consultations: state.consultations.iter().map(consultation_card).collect(),
                available_doctors: state
                    .doctors
                    .iter()
                    .take(DOCTOR_PREVIEW_LIMIT)
                    .map(|d| DoctorCard {
                        id: d.id.clone(),
                        name: d.name.clone(),
                        specialty: DOCTOR_SPECIALTY,
                        book: QuickAction {
                            label: "Book Appointment",
                            target: ActionTarget::BookConsultation,
                        },
                    })
                    .collect(),
            }),
            Tab::HealthRecords => TabPanel::HealthRecords(PlaceholderPanel {
                message: "Health Records will appear here.",
            }),
            Tab::Messages => TabPanel::Messages(PlaceholderPanel {
                message: "Messages will appear here.",
            }),
            Tab::Pharmacy => TabPanel::Pharmacy(PharmacyPanel {
                message: "Search for medicines and find nearby pharmacies.",
                find_medicine: self.find_medicine_action(),
            }),
            Tab::Settings => TabPanel::Settings(settings_panel(user.as_ref())),
        };

        DashboardView {
            welcome_name: user.and_then(|u| u.name),
            tabs,
            active_tab,
            call,
            panel,
        }
    }

    async fn start_call(&self, room: &str) -> Result<StartOutcome, DashboardError> {
        let user = self.user().unwrap_or_default();
        let display_name = user.display_name_or(&self.config.fallback_display_name);
        let outcome = self.calls.start_session(room, Some(display_name)).await?;
        Ok(outcome)
    }

    fn user(&self) -> Option<UserProfile> {
        read_user(self.storage.as_ref())
    }

    fn find_medicine_action(&self) -> QuickAction {
        QuickAction {
            label: "Find Medicine",
            target: ActionTarget::Navigate {
                url: self.config.medicine_marketplace_url.clone(),
            },
        }
    }
}

fn consultation_card(consultation: &Consultation) -> ConsultationCard {
    ConsultationCard {
        id: consultation.id.clone(),
        doctor_name: consultation
            .doctor_name()
            .unwrap_or(UNKNOWN_DOCTOR)
            .to_string(),
        status: consultation.status.clone(),
        completed: consultation.status == STATUS_COMPLETED,
        scheduled_date: consultation.scheduled_date.clone(),
        scheduled_at: consultation.scheduled_at(),
        consultation_type: consultation.consultation_type.clone(),
        join_room: consultation
            .is_scheduled()
            .then(|| consultation_room(consultation)),
    }
}

fn settings_panel(user: Option<&UserProfile>) -> SettingsPanel {
    let Some(user) = user else {
        return SettingsPanel::default();
    };

    SettingsPanel {
        name: user.name.clone().unwrap_or_default(),
        phone: user.phone.clone().unwrap_or_default(),
        email: user.email.clone().unwrap_or_default(),
        role: user.role.clone().unwrap_or_default(),
    }
}
