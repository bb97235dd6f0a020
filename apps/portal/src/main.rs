use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use dashboard_cell::DashboardState;
use shared_config::AppConfig;
use shared_utils::storage::FileStorage;
use video_conferencing_cell::services::{ScriptLoader, SessionWidgetAdapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting NIRAMYA patient portal");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());
    if !config.is_configured() {
        warn!("Backend API base URL is not configured, dashboard data will not load");
    }

    let storage = Arc::new(
        FileStorage::open(&config.storage_path)
            .with_context(|| format!("opening local storage at {}", config.storage_path))?,
    );

    info!("Local storage at {}", storage.path().display());

    // Video calls share one loader for the whole process
    let loader = Arc::new(ScriptLoader::from_config(&config)?);
    info!("Widget script {}", loader.script_url());
    let calls = Arc::new(SessionWidgetAdapter::from_config(&config, loader)?);

    let state = Arc::new(DashboardState::new(config.clone(), storage, calls));

    // Initial dashboard load, same as opening the page
    let report = state.controller.load_dashboard_data().await;
    info!(
        "Initial dashboard load: consultations={:?}, doctors={:?}",
        report.consultations, report.doctors
    );

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr.as_str())
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
