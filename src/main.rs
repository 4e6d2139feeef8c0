//! stream-hub server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use stream_hub::api;
use stream_hub::app_state::AppState;
use stream_hub::config::HubConfig;
use stream_hub::persistence::{MemoryStore, PostgresStore, TimelineStore};
use stream_hub::upload::{OutboxUploader, VideoUploader};
use stream_hub::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = HubConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting stream-hub");

    let store: Arc<dyn TimelineStore> = if config.persistence_enabled {
        let store = PostgresStore::connect(&config).await?;
        store.migrate().await?;
        tracing::info!("postgres store ready");
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, timeline is kept in memory only");
        Arc::new(MemoryStore::new())
    };

    tokio::fs::create_dir_all(&config.publish.outbox_dir).await?;
    let uploader: Arc<dyn VideoUploader> =
        Arc::new(OutboxUploader::new(&config.publish.outbox_dir));

    let app_state = AppState::new(&config, store, uploader);

    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// `LOG_FORMAT=json` switches to structured JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
