// libs/video-conferencing-cell/src/lib.rs
//! # Video Conferencing Cell
//!
//! Embedded call sessions for the patient dashboard, built on the Jitsi Meet
//! external API.
//!
//! ## Features
//!
//! - **Single loader script**: the widget script is fetched at most once per
//!   process, concurrent callers queue behind the first fetch
//! - **One call at a time**: starting a call disposes the previous one first
//! - **Termination events**: `readyToClose` and `videoConferenceLeft` both end
//!   the call
//! - **Phase broadcast**: `Idle -> Connecting -> Active -> Ending -> Idle`
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------+
//! |                   Video Cell                        |
//! +-----------------------------------------------------+
//! |  models.rs      |  Call phases, options, errors     |
//! |  services/      |  Call lifecycle                   |
//! |    loader.rs    |  Loader script state machine      |
//! |    widget.rs    |  Widget constructor/handle traits |
//! |    jitsi.rs     |  Jitsi Meet implementation        |
//! |    session.rs   |  Session widget adapter           |
//! +-----------------------------------------------------+
//! ```
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use shared_config::AppConfig;
//! use video_conferencing_cell::services::{ScriptLoader, SessionWidgetAdapter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env();
//! let loader = Arc::new(ScriptLoader::from_config(&config)?);
//! let adapter = SessionWidgetAdapter::from_config(&config, loader)?;
//!
//! adapter.start_session("NiramyaConsultation_42", Some("Asha")).await?;
//! adapter.hang_up().await;
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod services;
pub mod test_support;

// Re-export commonly used types
pub use models::{
    CallPhase, EmbedDescriptor, ScriptStatus, SessionOptions, StartOutcome,
    VideoConferencingError, WidgetEvent,
};

pub use services::{
    ConferenceHandle, ConferenceWidgetFactory, HttpScriptSource, JitsiMeetFactory,
    ScriptLoader, ScriptSource, SessionWidgetAdapter,
};
