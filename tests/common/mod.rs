//! Shared harness: serves the hub on an ephemeral port over the in-memory
//! store.

#![allow(dead_code, missing_docs)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use stream_hub::api;
use stream_hub::app_state::AppState;
use stream_hub::config::{HubConfig, PublishConfig};
use stream_hub::persistence::{MemoryStore, TimelineStore};
use stream_hub::upload::{OutboxUploader, VideoUploader};
use stream_hub::ws::handler::ws_handler;

pub fn config(outbox: &Path) -> HubConfig {
    HubConfig {
        listen_addr: ([127, 0, 0, 1], 0).into(),
        database_url: String::new(),
        database_max_connections: 1,
        database_min_connections: 0,
        database_connect_timeout_secs: 1,
        persistence_enabled: false,
        request_timeout_secs: 30,
        event_bus_capacity: 64,
        publish: PublishConfig {
            outbox_dir: outbox.to_path_buf(),
            ..PublishConfig::default()
        },
        tts_command: "true".to_string(),
    }
}

/// Starts a server and returns its address.
#[allow(clippy::panic)]
pub async fn spawn_hub(outbox: &Path) -> SocketAddr {
    let config = config(outbox);
    let store: Arc<dyn TimelineStore> = Arc::new(MemoryStore::new());
    let uploader: Arc<dyn VideoUploader> = Arc::new(OutboxUploader::new(outbox));
    let state = AppState::new(&config, store, uploader);
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .with_state(state);

    let Ok(listener) = tokio::net::TcpListener::bind(config.listen_addr).await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
