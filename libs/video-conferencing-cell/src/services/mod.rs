// libs/video-conferencing-cell/src/services/mod.rs

pub mod jitsi;
pub mod loader;
pub mod session;
pub mod widget;

pub use jitsi::JitsiMeetFactory;
pub use loader::{HttpScriptSource, ScriptLoader, ScriptSource};
pub use session::SessionWidgetAdapter;
pub use widget::{ConferenceHandle, ConferenceWidgetFactory, EventListener};
