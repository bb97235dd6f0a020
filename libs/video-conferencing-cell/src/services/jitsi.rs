// libs/video-conferencing-cell/src/services/jitsi.rs
use tracing::{debug, info};

use crate::models::{EmbedDescriptor, SessionOptions, VideoConferencingError, WidgetEvent};
use crate::services::widget::{ConferenceHandle, ConferenceWidgetFactory, EventListener};

/// Builds Jitsi Meet sessions.
/// Based on: https://jitsi.github.io/handbook/docs/dev-guide/dev-guide-iframe
#[derive(Debug, Default, Clone)]
pub struct JitsiMeetFactory;

impl JitsiMeetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ConferenceWidgetFactory for JitsiMeetFactory {
    fn create(
        &self,
        domain: &str,
        options: SessionOptions,
    ) -> Result<Box<dyn ConferenceHandle>, VideoConferencingError> {
        if domain.trim().is_empty() {
            return Err(VideoConferencingError::NotConfigured);
        }

        info!("Creating Jitsi session for room {} on {}", options.room_name, domain);

        Ok(Box::new(JitsiMeetSession {
            domain: domain.to_string(),
            options,
            listeners: Vec::new(),
            disposed: false,
        }))
    }
}

pub struct JitsiMeetSession {
    domain: String,
    options: SessionOptions,
    listeners: Vec<(WidgetEvent, EventListener)>,
    disposed: bool,
}

impl JitsiMeetSession {
    /// Iframe URL carrying the options as Jitsi hash parameters. Each value
    /// is JSON, percent-encoded.
    pub fn embed_url(&self) -> String {
        let display_name = serde_json::Value::String(self.options.user_info.display_name.clone());
        let toolbar = serde_json::Value::from(self.options.interface_config_overwrite.toolbar_buttons.clone());

        let params = [
            format!("userInfo.displayName={}", urlencoding::encode(&display_name.to_string())),
            format!(
                "config.startWithAudioMuted={}",
                self.options.config_overwrite.start_with_audio_muted
            ),
            format!(
                "config.startWithVideoMuted={}",
                self.options.config_overwrite.start_with_video_muted
            ),
            format!(
                "interfaceConfig.TOOLBAR_BUTTONS={}",
                urlencoding::encode(&toolbar.to_string())
            ),
        ];

        format!(
            "https://{}/{}#{}",
            self.domain,
            urlencoding::encode(&self.options.room_name),
            params.join("&")
        )
    }
}

impl ConferenceHandle for JitsiMeetSession {
    fn add_listener(&mut self, event: WidgetEvent, listener: EventListener) {
        debug!("Registering {} listener on {}", event.as_str(), self.options.room_name);
        self.listeners.push((event, listener));
    }

    fn notify(&self, event: WidgetEvent) -> usize {
        if self.disposed {
            return 0;
        }

        let mut fired = 0;
        for (registered, listener) in &self.listeners {
            if *registered == event {
                listener(event);
                fired += 1;
            }
        }
        fired
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        info!("Disposing Jitsi session for room {}", self.options.room_name);
        self.listeners.clear();
        self.disposed = true;
    }

    fn embed(&self) -> EmbedDescriptor {
        EmbedDescriptor {
            domain: self.domain.clone(),
            room_name: self.options.room_name.clone(),
            embed_url: self.embed_url(),
            options: self.options.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn session(room: &str, name: &str) -> Box<dyn ConferenceHandle> {
        JitsiMeetFactory::new()
            .create("meet.jit.si", SessionOptions::new(room, name))
            .unwrap()
    }

    #[test]
    fn test_embed_url_encodes_options() {
        let handle = session("NiramyaConsultation_abc", "Asha Verma");
        let embed = handle.embed();

        assert_eq!(embed.domain, "meet.jit.si");
        assert_eq!(embed.room_name, "NiramyaConsultation_abc");
        assert!(embed
            .embed_url
            .starts_with("https://meet.jit.si/NiramyaConsultation_abc#"));
        assert!(embed
            .embed_url
            .contains("userInfo.displayName=%22Asha%20Verma%22"));
        assert!(embed.embed_url.contains("config.startWithAudioMuted=false"));
        assert!(embed.embed_url.contains("config.startWithVideoMuted=false"));
        assert!(embed.embed_url.contains("interfaceConfig.TOOLBAR_BUTTONS=%5B%22microphone%22"));
    }

    #[test]
    fn test_display_name_cannot_inject_parameters() {
        let handle = session("room", "A&config.startWithAudioMuted=true");
        let url = handle.embed().embed_url;

        assert_eq!(url.matches("config.startWithAudioMuted=").count(), 1);
        assert!(url.contains("config.startWithAudioMuted=false"));
    }

    #[test]
    fn test_listeners_fire_by_event_until_disposed() {
        let mut handle = session("room", "Asha");
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        handle.add_listener(
            WidgetEvent::ReadyToClose,
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(handle.notify(WidgetEvent::VideoConferenceLeft), 0);
        assert_eq!(handle.notify(WidgetEvent::ReadyToClose), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        handle.dispose();
        assert_eq!(handle.notify(WidgetEvent::ReadyToClose), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_domain_is_rejected() {
        let result = JitsiMeetFactory::new().create("", SessionOptions::new("room", "Asha"));
        assert!(matches!(result, Err(VideoConferencingError::NotConfigured)));
    }
}
