// libs/video-conferencing-cell/src/services/widget.rs
use crate::models::{EmbedDescriptor, SessionOptions, VideoConferencingError, WidgetEvent};

pub type EventListener = Box<dyn Fn(WidgetEvent) + Send + Sync>;

/// Handle to one constructed call session, mirroring the widget's
/// `addListener` / `dispose` surface.
pub trait ConferenceHandle: Send + Sync {
    fn add_listener(&mut self, event: WidgetEvent, listener: EventListener);

    /// Delivers an event reported by the embedding page to the listeners
    /// registered for it. Returns how many listeners ran.
    fn notify(&self, event: WidgetEvent) -> usize;

    fn dispose(&mut self);

    fn embed(&self) -> EmbedDescriptor;
}

/// Widget constructor: signaling domain plus options, returning a handle.
pub trait ConferenceWidgetFactory: Send + Sync {
    fn create(
        &self,
        domain: &str,
        options: SessionOptions,
    ) -> Result<Box<dyn ConferenceHandle>, VideoConferencingError>;
}
