// libs/video-conferencing-cell/src/test_support.rs
//! In-process stand-ins for the loader script and the widget, for tests in
//! this crate and in the cells that embed calls.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{EmbedDescriptor, SessionOptions, VideoConferencingError, WidgetEvent};
use crate::services::loader::{ScriptLoader, ScriptSource};
use crate::services::session::SessionWidgetAdapter;
use crate::services::widget::{ConferenceHandle, ConferenceWidgetFactory, EventListener};

pub const TEST_DOMAIN: &str = "meet.test";
pub const TEST_SCRIPT_URL: &str = "https://meet.test/external_api.js";

/// Script source that succeeds after an optional delay, failing the first
/// `failures` attempts.
#[derive(Default)]
pub struct StubScriptSource {
    delay: Duration,
    failures: AtomicUsize,
    loads: AtomicUsize,
}

impl StubScriptSource {
    pub fn instant() -> Self {
        Self::default()
    }

    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            ..Self::default()
        }
    }

    pub fn delayed_failing(delay: Duration, failures: usize) -> Self {
        Self {
            delay,
            failures: AtomicUsize::new(failures),
            ..Self::default()
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptSource for StubScriptSource {
    async fn load(&self, url: &str) -> Result<(), VideoConferencingError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(VideoConferencingError::ScriptLoad {
                message: format!("stub refused {}", url),
            });
        }
        Ok(())
    }
}

/// Counters shared by a `RecordingWidgetFactory` and every handle it made.
#[derive(Default)]
pub struct WidgetStats {
    created: AtomicUsize,
    disposed: AtomicUsize,
    peak_live: AtomicUsize,
    rooms: Mutex<Vec<String>>,
    captured: Mutex<Vec<(String, WidgetEvent, Arc<EventListener>)>>,
}

impl WidgetStats {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn disposed(&self) -> usize {
        self.disposed.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.created() - self.disposed()
    }

    /// Highest number of undisposed handles ever observed.
    pub fn peak_live(&self) -> usize {
        self.peak_live.load(Ordering::SeqCst)
    }

    pub fn rooms(&self) -> Vec<String> {
        self.rooms.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Invokes every listener ever registered in `room` for `event`, even on
    /// handles that were disposed since. Simulates a widget callback that
    /// arrives late.
    pub fn fire_captured(&self, room: &str, event: WidgetEvent) -> usize {
        let listeners: Vec<Arc<EventListener>> = match self.captured.lock() {
            Ok(captured) => captured
                .iter()
                .filter(|(r, e, _)| r == room && *e == event)
                .map(|(_, _, listener)| Arc::clone(listener))
                .collect(),
            Err(_) => return 0,
        };
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    fn record_create(&self, room: &str) {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.peak_live.fetch_max(self.live(), Ordering::SeqCst);
        if let Ok(mut rooms) = self.rooms.lock() {
            rooms.push(room.to_string());
        }
    }
}

#[derive(Default)]
pub struct RecordingWidgetFactory {
    stats: Arc<WidgetStats>,
    fail_next: AtomicBool,
}

impl RecordingWidgetFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<WidgetStats> {
        Arc::clone(&self.stats)
    }

    /// Makes the next `create` call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl ConferenceWidgetFactory for RecordingWidgetFactory {
    fn create(
        &self,
        domain: &str,
        options: SessionOptions,
    ) -> Result<Box<dyn ConferenceHandle>, VideoConferencingError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(VideoConferencingError::WidgetUnavailable {
                message: "recording factory told to fail".to_string(),
            });
        }

        self.stats.record_create(&options.room_name);
        Ok(Box::new(RecordingHandle {
            domain: domain.to_string(),
            options,
            listeners: Vec::new(),
            disposed: false,
            stats: Arc::clone(&self.stats),
        }))
    }
}

pub struct RecordingHandle {
    domain: String,
    options: SessionOptions,
    listeners: Vec<(WidgetEvent, Arc<EventListener>)>,
    disposed: bool,
    stats: Arc<WidgetStats>,
}

impl ConferenceHandle for RecordingHandle {
    fn add_listener(&mut self, event: WidgetEvent, listener: EventListener) {
        let listener = Arc::new(listener);
        if let Ok(mut captured) = self.stats.captured.lock() {
            captured.push((self.options.room_name.clone(), event, Arc::clone(&listener)));
        }
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
        if !self.disposed {
            self.disposed = true;
            self.listeners.clear();
            self.stats.disposed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn embed(&self) -> EmbedDescriptor {
        EmbedDescriptor {
            domain: self.domain.clone(),
            room_name: self.options.room_name.clone(),
            embed_url: format!("https://{}/{}", self.domain, self.options.room_name),
            options: self.options.clone(),
        }
    }
}

/// Adapter wired to `source` and a fresh recording factory.
pub fn recording_adapter(
    source: Arc<StubScriptSource>,
) -> (Arc<SessionWidgetAdapter>, Arc<WidgetStats>, Arc<RecordingWidgetFactory>) {
    let factory = Arc::new(RecordingWidgetFactory::new());
    let stats = factory.stats();
    let loader = Arc::new(ScriptLoader::new(TEST_SCRIPT_URL, source));
    let adapter = Arc::new(SessionWidgetAdapter::new(
        TEST_DOMAIN,
        "Patient",
        loader,
        factory.clone(),
    ));
    (adapter, stats, factory)
}
