// libs/video-conferencing-cell/src/services/session.rs
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info, instrument, warn};

use shared_config::AppConfig;

use crate::models::{
    CallPhase, EmbedDescriptor, SessionOptions, SessionSignal, StartOutcome,
    VideoConferencingError, WidgetEvent,
};
use crate::services::jitsi::JitsiMeetFactory;
use crate::services::loader::ScriptLoader;
use crate::services::widget::{ConferenceHandle, ConferenceWidgetFactory};

enum CallState {
    Idle,
    Connecting,
    Active { handle: Box<dyn ConferenceHandle> },
    Ending,
}

impl CallState {
    fn phase(&self) -> CallPhase {
        match self {
            CallState::Idle => CallPhase::Idle,
            CallState::Connecting => CallPhase::Connecting,
            CallState::Active { .. } => CallPhase::Active,
            CallState::Ending => CallPhase::Ending,
        }
    }
}

struct CallSlot {
    state: CallState,
    // Bumped by every start; completions and signals from older starts are stale.
    generation: u64,
}

/// Owns the single embedded call session.
/// Handles script loading, session construction, termination events and disposal.
pub struct SessionWidgetAdapter {
    domain: String,
    fallback_display_name: String,
    loader: Arc<ScriptLoader>,
    factory: Arc<dyn ConferenceWidgetFactory>,
    slot: Mutex<CallSlot>,
    signal_tx: mpsc::UnboundedSender<SessionSignal>,
    signal_rx: Mutex<mpsc::UnboundedReceiver<SessionSignal>>,
    phase_tx: broadcast::Sender<CallPhase>,
}

impl SessionWidgetAdapter {
    pub fn new(
        domain: impl Into<String>,
        fallback_display_name: impl Into<String>,
        loader: Arc<ScriptLoader>,
        factory: Arc<dyn ConferenceWidgetFactory>,
    ) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (phase_tx, _) = broadcast::channel(64);

        Self {
            domain: domain.into(),
            fallback_display_name: fallback_display_name.into(),
            loader,
            factory,
            slot: Mutex::new(CallSlot {
                state: CallState::Idle,
                generation: 0,
            }),
            signal_tx,
            signal_rx: Mutex::new(signal_rx),
            phase_tx,
        }
    }

    /// Jitsi-backed adapter sharing the process-wide `loader`.
    pub fn from_config(
        config: &AppConfig,
        loader: Arc<ScriptLoader>,
    ) -> Result<Self, VideoConferencingError> {
        if !config.is_video_conferencing_configured() {
            return Err(VideoConferencingError::NotConfigured);
        }

        Ok(Self::new(
            config.jitsi_domain.clone(),
            config.fallback_display_name.clone(),
            loader,
            Arc::new(JitsiMeetFactory::new()),
        ))
    }

    pub fn loader(&self) -> &ScriptLoader {
        &self.loader
    }

    /// Receives every phase transition from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CallPhase> {
        self.phase_tx.subscribe()
    }

    pub async fn phase(&self) -> CallPhase {
        self.slot.lock().await.state.phase()
    }

    pub async fn is_in_call(&self) -> bool {
        self.phase().await.is_in_call()
    }

    pub async fn embed(&self) -> Option<EmbedDescriptor> {
        match &self.slot.lock().await.state {
            CallState::Active { handle } => Some(handle.embed()),
            _ => None,
        }
    }

    /// Starts a call in `room_identifier`, replacing any current session.
    #[instrument(skip(self))]
    pub async fn start_session(
        &self,
        room_identifier: &str,
        display_name: Option<&str>,
    ) -> Result<StartOutcome, VideoConferencingError> {
        let room_name = room_identifier.trim();
        if room_name.is_empty() {
            return Err(VideoConferencingError::InvalidRoom);
        }

        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.fallback_display_name)
            .to_string();

        let generation = {
            let mut slot = self.slot.lock().await;
            self.release(&mut slot);
            slot.generation += 1;
            self.transition(&mut slot, CallState::Connecting);
            slot.generation
        };

        info!("Connecting to room {} as {} (session #{})", room_name, display_name, generation);

        if let Err(e) = self.loader.ensure_loaded().await {
            let mut slot = self.slot.lock().await;
            if slot.generation != generation || !matches!(slot.state, CallState::Connecting) {
                debug!("Session #{} superseded, dropping its script load error", generation);
                return Ok(StartOutcome::Superseded);
            }
            self.transition(&mut slot, CallState::Idle);
            return Err(e);
        }

        let mut slot = self.slot.lock().await;
        if slot.generation != generation || !matches!(slot.state, CallState::Connecting) {
            debug!("Session #{} superseded before the widget loaded", generation);
            return Ok(StartOutcome::Superseded);
        }

        let options = SessionOptions::new(room_name, &display_name);
        let mut handle = match self.factory.create(&self.domain, options) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Widget construction failed for room {}: {}", room_name, e);
                self.transition(&mut slot, CallState::Idle);
                return Err(e);
            }
        };

        for event in WidgetEvent::TERMINATION {
            let signal_tx = self.signal_tx.clone();
            handle.add_listener(
                event,
                Box::new(move |event| {
                    let _ = signal_tx.send(SessionSignal { generation, event });
                }),
            );
        }

        self.transition(&mut slot, CallState::Active { handle });
        info!("Session #{} active in room {}", generation, room_name);

        Ok(StartOutcome::Started {
            room_name: room_name.to_string(),
        })
    }

    /// Ends the current call, if any. Safe to call repeatedly.
    pub async fn hang_up(&self) {
        let mut slot = self.slot.lock().await;
        if matches!(slot.state, CallState::Idle) {
            debug!("Hang up requested with no active session");
            return;
        }

        info!("Hanging up session #{}", slot.generation);
        self.release(&mut slot);
    }

    /// Forwards an event reported by the embedding page to the active
    /// session, then handles any termination it triggered.
    pub async fn dispatch_widget_event(&self, event: WidgetEvent) -> usize {
        let fired = {
            let slot = self.slot.lock().await;
            match &slot.state {
                CallState::Active { handle } => handle.notify(event),
                _ => 0,
            }
        };

        if fired == 0 {
            debug!("No listener for {} in the current session", event.as_str());
        }

        self.process_signals().await;
        fired
    }

    /// Applies queued termination signals. Returns how many ended a call.
    pub async fn process_signals(&self) -> usize {
        let mut handled = 0;
        let mut signal_rx = self.signal_rx.lock().await;

        while let Ok(signal) = signal_rx.try_recv() {
            let mut slot = self.slot.lock().await;
            if signal.generation != slot.generation || !matches!(slot.state, CallState::Active { .. }) {
                debug!(
                    "Ignoring stale {} from session #{}",
                    signal.event.as_str(),
                    signal.generation
                );
                continue;
            }

            info!("Session #{} ended by {}", signal.generation, signal.event.as_str());
            self.release(&mut slot);
            handled += 1;
        }

        handled
    }

    // Disposes the active handle or cancels a pending connect. Leaves the slot idle.
    fn release(&self, slot: &mut CallSlot) {
        match std::mem::replace(&mut slot.state, CallState::Idle) {
            CallState::Active { mut handle } => {
                self.transition(slot, CallState::Ending);
                handle.dispose();
                self.transition(slot, CallState::Idle);
            }
            CallState::Connecting => {
                debug!("Cancelling pending session #{}", slot.generation);
                self.transition(slot, CallState::Idle);
            }
            CallState::Idle | CallState::Ending => {}
        }
    }

    fn transition(&self, slot: &mut CallSlot, next: CallState) {
        let phase = next.phase();
        slot.state = next;
        // No subscribers is fine.
        let _ = self.phase_tx.send(phase);
    }
}
