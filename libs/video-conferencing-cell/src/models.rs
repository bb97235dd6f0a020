// libs/video-conferencing-cell/src/models.rs
use serde::{Deserialize, Serialize};

// ==============================================================================
// EMBEDDED CALL DOMAIN MODELS
// ==============================================================================

/// Toolbar offered inside every call, in display order.
pub const TOOLBAR_BUTTONS: &[&str] = &[
    "microphone",
    "camera",
    "closedcaptions",
    "desktop",
    "fullscreen",
    "fodeviceselection",
    "hangup",
    "profile",
    "chat",
    "recording",
    "livestreaming",
    "etherpad",
    "sharedvideo",
    "settings",
    "raisehand",
    "videoquality",
    "filmstrip",
    "invite",
    "feedback",
    "stats",
    "shortcuts",
    "tileview",
    "videobackgroundblur",
    "download",
    "help",
    "mute-everyone",
];

/// Widget events this adapter listens for. Either one ends the call,
/// depending on whether the local user or the remote side closed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetEvent {
    ReadyToClose,
    VideoConferenceLeft,
}

impl WidgetEvent {
    pub const TERMINATION: [WidgetEvent; 2] =
        [WidgetEvent::ReadyToClose, WidgetEvent::VideoConferenceLeft];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetEvent::ReadyToClose => "readyToClose",
            WidgetEvent::VideoConferenceLeft => "videoConferenceLeft",
        }
    }
}

/// Externally visible phase of the call slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    /// No session and nothing pending.
    Idle,
    /// Waiting for the loader script before the session can be built.
    Connecting,
    /// A session handle exists.
    Active,
    /// The handle is being disposed.
    Ending,
}

impl CallPhase {
    /// The in-call flag: true exactly when a session handle exists.
    pub fn is_in_call(self) -> bool {
        matches!(self, CallPhase::Active)
    }
}

/// Loader script lifecycle, shared by every session in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStatus {
    NotLoaded,
    Loading,
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverwrite {
    pub start_with_audio_muted: bool,
    pub start_with_video_muted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceConfigOverwrite {
    #[serde(rename = "TOOLBAR_BUTTONS")]
    pub toolbar_buttons: Vec<String>,
}

/// Options object handed to the widget constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    pub room_name: String,
    pub width: String,
    pub height: String,
    pub user_info: UserInfo,
    pub config_overwrite: ConfigOverwrite,
    pub interface_config_overwrite: InterfaceConfigOverwrite,
}

impl SessionOptions {
    pub fn new(room_name: &str, display_name: &str) -> Self {
        Self {
            room_name: room_name.to_string(),
            width: "100%".to_string(),
            height: "100%".to_string(),
            user_info: UserInfo {
                display_name: display_name.to_string(),
            },
            config_overwrite: ConfigOverwrite {
                start_with_audio_muted: false,
                start_with_video_muted: false,
            },
            interface_config_overwrite: InterfaceConfigOverwrite {
                toolbar_buttons: TOOLBAR_BUTTONS.iter().map(|b| b.to_string()).collect(),
            },
        }
    }
}

/// What the browser shell needs to mount the live session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedDescriptor {
    pub domain: String,
    pub room_name: String,
    pub embed_url: String,
    pub options: SessionOptions,
}

/// Termination signal raised by a session listener, tagged with the
/// generation of the session that registered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSignal {
    pub generation: u64,
    pub event: WidgetEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StartOutcome {
    /// The session was built and is now the active call.
    Started { room_name: String },
    /// A hangup or a newer start arrived while the script was loading.
    Superseded,
}

// ==============================================================================
// ERROR HANDLING
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum VideoConferencingError {
    #[error("Room identifier must not be empty")]
    InvalidRoom,

    #[error("Widget loader script failed to load: {message}")]
    ScriptLoad { message: String },

    #[error("Video widget unavailable: {message}")]
    WidgetUnavailable { message: String },

    #[error("Video conferencing not configured")]
    NotConfigured,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<reqwest::Error> for VideoConferencingError {
    fn from(err: reqwest::Error) -> Self {
        VideoConferencingError::ScriptLoad {
            message: err.to_string(),
        }
    }
}
