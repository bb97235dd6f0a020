// libs/video-conferencing-cell/src/services/loader.rs
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{ScriptStatus, VideoConferencingError};

/// Global the loader script must define before a widget can be constructed.
pub const WIDGET_GLOBAL: &str = "JitsiMeetExternalAPI";

/// Where the widget's loader script comes from.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    async fn load(&self, url: &str) -> Result<(), VideoConferencingError>;
}

/// Fetches the loader script over HTTP and checks that it exposes the widget
/// constructor.
pub struct HttpScriptSource {
    client: Client,
}

impl HttpScriptSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpScriptSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScriptSource for HttpScriptSource {
    async fn load(&self, url: &str) -> Result<(), VideoConferencingError> {
        debug!("Fetching widget loader script from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(VideoConferencingError::ScriptLoad {
                message: format!("HTTP {} from {}", status, url),
            });
        }

        let body = response.text().await?;
        if !body.contains(WIDGET_GLOBAL) {
            return Err(VideoConferencingError::WidgetUnavailable {
                message: format!("{} does not define {}", url, WIDGET_GLOBAL),
            });
        }

        Ok(())
    }
}

type LoadWaiter = oneshot::Sender<Result<(), VideoConferencingError>>;

enum LoaderState {
    NotLoaded,
    Loading { waiters: Vec<LoadWaiter> },
    Loaded,
}

/// Guards the loader script so it is injected at most once per process.
///
/// The first caller moves the state to `Loading` and spawns the fetch; every
/// caller, the first included, waits on a oneshot continuation. A failed load
/// falls back to `NotLoaded` so a later call can try again.
pub struct ScriptLoader {
    script_url: String,
    source: Arc<dyn ScriptSource>,
    state: Arc<Mutex<LoaderState>>,
    injections: Arc<AtomicUsize>,
}

impl ScriptLoader {
    pub fn new(script_url: impl Into<String>, source: Arc<dyn ScriptSource>) -> Self {
        Self {
            script_url: script_url.into(),
            source,
            state: Arc::new(Mutex::new(LoaderState::NotLoaded)),
            injections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, VideoConferencingError> {
        if !config.is_video_conferencing_configured() {
            return Err(VideoConferencingError::NotConfigured);
        }

        Ok(Self::new(
            config.jitsi_script_url.clone(),
            Arc::new(HttpScriptSource::new()),
        ))
    }

    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    /// Number of times the script has actually been requested.
    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    pub async fn status(&self) -> ScriptStatus {
        match &*self.state.lock().await {
            LoaderState::NotLoaded => ScriptStatus::NotLoaded,
            LoaderState::Loading { .. } => ScriptStatus::Loading,
            LoaderState::Loaded => ScriptStatus::Loaded,
        }
    }

    /// Resolves once the script is available, loading it if nobody has yet.
    pub async fn ensure_loaded(&self) -> Result<(), VideoConferencingError> {
        let (tx, rx) = oneshot::channel();

        {
            let mut state = self.state.lock().await;
            match &mut *state {
                LoaderState::Loaded => return Ok(()),
                LoaderState::Loading { waiters } => {
                    debug!("Loader script already in flight, queueing continuation");
                    waiters.push(tx);
                }
                LoaderState::NotLoaded => {
                    *state = LoaderState::Loading { waiters: vec![tx] };
                    self.spawn_load();
                }
            }
        }

        rx.await.unwrap_or_else(|_| {
            Err(VideoConferencingError::ScriptLoad {
                message: "loader task ended without a result".to_string(),
            })
        })
    }

    // The fetch runs detached so a caller that goes away mid-load cannot
    // leave the state stuck in `Loading`.
    fn spawn_load(&self) {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let url = self.script_url.clone();

        self.injections.fetch_add(1, Ordering::SeqCst);
        info!("Injecting widget loader script {}", url);

        tokio::spawn(async move {
            let result = source.load(&url).await;

            let next = if result.is_ok() {
                LoaderState::Loaded
            } else {
                LoaderState::NotLoaded
            };

            let waiters = {
                let mut state = state.lock().await;
                match std::mem::replace(&mut *state, next) {
                    LoaderState::Loading { waiters } => waiters,
                    _ => Vec::new(),
                }
            };

            match &result {
                Ok(()) => info!("Widget loader script ready ({} waiting)", waiters.len()),
                Err(e) => error!("Widget loader script failed: {}", e),
            }

            for waiter in waiters {
                let _ = waiter.send(result.clone());
            }
        });
    }
}
