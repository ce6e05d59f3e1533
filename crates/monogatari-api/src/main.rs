//! Monogatari API server entry point.

use std::error::Error;
use std::sync::Arc;

use monogatari_api::config::ServerConfig;
use monogatari_api::state::AppState;
use monogatari_core::clock::SystemClock;
use monogatari_core::report::TracingErrorReporter;
use monogatari_persistence::file_store::FileKeyValueStore;
use monogatari_scenario::application::source::DirectoryChapterSource;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Monogatari API server");

    // Read configuration from environment.
    let config = ServerConfig::from_env()?;

    // Build application state.
    let app_state = AppState::new(
        Arc::new(DirectoryChapterSource::new(&config.scenario_dir)),
        Arc::new(FileKeyValueStore::new(&config.save_dir)),
        Arc::new(SystemClock),
        Arc::new(TracingErrorReporter),
    );

    // Build router.
    // TODO: Replace CorsLayer::permissive() with the front end's origin once it is served separately.
    let app = monogatari_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!(
        %addr,
        scenario_dir = %config.scenario_dir.display(),
        save_dir = %config.save_dir.display(),
        "listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
