// libs/dashboard-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use video_conferencing_cell::models::{CallPhase, EmbedDescriptor, VideoConferencingError};

// ==============================================================================
// BACKEND RECORDS
// ==============================================================================

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_COMPLETED: &str = "completed";

/// Doctor reference inside a consultation. The backend sends either the
/// populated record or the bare identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DoctorRef {
    Populated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Reference(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "scheduledDate", default)]
    pub scheduled_date: String,
    #[serde(rename = "doctorId", default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorRef>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub consultation_type: Option<String>,
}

impl Consultation {
    /// Parsed `scheduledDate`. Accepts RFC 3339, a date-time without offset
    /// and a bare date; the last two are taken as UTC.
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.scheduled_date.trim();

        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(at.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|at| at.and_utc())
    }

    /// Strictly later than `now`. Status plays no part.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at().map_or(false, |at| at > now)
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == STATUS_SCHEDULED
    }

    pub fn doctor_name(&self) -> Option<&str> {
        match &self.doctor {
            Some(DoctorRef::Populated { name: Some(name) }) if !name.trim().is_empty() => {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

// ==============================================================================
// VIEW STATE
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Overview,
    Consultations,
    HealthRecords,
    Messages,
    Pharmacy,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Consultations,
        Tab::HealthRecords,
        Tab::Messages,
        Tab::Pharmacy,
        Tab::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Consultations => "Consultations",
            Tab::HealthRecords => "Health Records",
            Tab::Messages => "Messages",
            Tab::Pharmacy => "Pharmacy",
            Tab::Settings => "Settings",
        }
    }
}

/// Mutable dashboard state. Everything shown on screen is derived from it.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub active_tab: Tab,
    pub consultations: Vec<Consultation>,
    pub doctors: Vec<Doctor>,
}

// ==============================================================================
// FETCH REPORTING
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus {
    /// Collection replaced with `count` records.
    Updated { count: usize },
    /// Backend answered with a non-success status; prior data kept.
    Rejected { message: String },
    /// Request or body parsing failed; prior data kept.
    Failed { message: String },
    /// No credential stored; no request made.
    Skipped,
}

impl FetchStatus {
    pub fn is_updated(&self) -> bool {
        matches!(self, FetchStatus::Updated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub consultations: FetchStatus,
    pub doctors: FetchStatus,
}

impl LoadReport {
    pub fn skipped() -> Self {
        Self {
            consultations: FetchStatus::Skipped,
            doctors: FetchStatus::Skipped,
        }
    }
}

// ==============================================================================
// RENDERED VIEWS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabEntry {
    pub id: Tab,
    pub name: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTile {
    pub name: &'static str,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionTarget {
    /// Start a fresh consultation call.
    BookConsultation,
    /// Leave the app for an external or deep-link URL.
    Navigate { url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub target: ActionTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentActivity {
    pub kind: &'static str,
    pub message: &'static str,
    pub time: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewPanel {
    pub stats: Vec<StatTile>,
    pub quick_actions: Vec<QuickAction>,
    pub recent_activity: Vec<RecentActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultationCard {
    pub id: String,
    pub doctor_name: String,
    pub status: String,
    pub completed: bool,
    pub scheduled_date: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub consultation_type: Option<String>,
    /// Set only for scheduled consultations: the room a join would use.
    pub join_room: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorCard {
    pub id: String,
    pub name: String,
    pub specialty: &'static str,
    pub book: QuickAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultationsPanel {
    pub consultations: Vec<ConsultationCard>,
    pub available_doctors: Vec<DoctorCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderPanel {
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PharmacyPanel {
    pub message: &'static str,
    pub find_medicine: QuickAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsPanel {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", content = "content", rename_all = "kebab-case")]
pub enum TabPanel {
    Overview(OverviewPanel),
    Consultations(ConsultationsPanel),
    HealthRecords(PlaceholderPanel),
    Messages(PlaceholderPanel),
    Pharmacy(PharmacyPanel),
    Settings(SettingsPanel),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallView {
    pub phase: CallPhase,
    pub in_call: bool,
    pub embed: Option<EmbedDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub welcome_name: Option<String>,
    pub tabs: Vec<TabEntry>,
    pub active_tab: Tab,
    pub call: CallView,
    pub panel: TabPanel,
}

// ==============================================================================
// FEATURES PAGE
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureColor {
    Blue,
    Green,
    Indigo,
    Orange,
    Teal,
    Pink,
}

impl FeatureColor {
    /// Gradient classes for the card header and benefit bullets.
    pub fn gradient(&self) -> &'static str {
        match self {
            FeatureColor::Blue => "from-blue-500 to-blue-600 hover:from-blue-600 hover:to-blue-700",
            FeatureColor::Green => "from-green-500 to-green-600 hover:from-green-600 hover:to-green-700",
            FeatureColor::Indigo => "from-indigo-500 to-indigo-600 hover:from-indigo-600 hover:to-indigo-700",
            FeatureColor::Orange => "from-orange-500 to-orange-600 hover:from-orange-600 hover:to-orange-700",
            FeatureColor::Teal => "from-teal-500 to-teal-600 hover:from-teal-600 hover:to-teal-700",
            FeatureColor::Pink => "from-pink-500 to-pink-600 hover:from-pink-600 hover:to-pink-700",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub benefits: Vec<&'static str>,
    pub color: FeatureColor,
    pub gradient: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub title: &'static str,
    pub subtitle: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallToAction {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturesPage {
    pub hero: Banner,
    pub features: Vec<Feature>,
    pub call_to_action: CallToAction,
}

// ==============================================================================
// ERROR HANDLING
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Consultation {id} not found")]
    ConsultationNotFound { id: String },

    #[error("Consultation {id} is {status}, only scheduled consultations can be joined")]
    NotJoinable { id: String, status: String },

    #[error(transparent)]
    Video(#[from] VideoConferencingError),
}
