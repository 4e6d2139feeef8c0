//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::HubConfig;
use crate::domain::EventBus;
use crate::persistence::TimelineStore;
use crate::service::{CaptureService, PublishService, SpeechService};
use crate::upload::VideoUploader;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live metadata, caption and recording writes.
    pub capture: Arc<CaptureService>,
    /// Recording queries, rendering and publication.
    pub publish: Arc<PublishService>,
    /// Text-to-speech.
    pub speech: Arc<SpeechService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires every service over one store, one uploader and one event bus.
    #[must_use]
    pub fn new(
        config: &HubConfig,
        store: Arc<dyn TimelineStore>,
        uploader: Arc<dyn VideoUploader>,
    ) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let capture = CaptureService::new(Arc::clone(&store), event_bus.clone());
        let publish = PublishService::new(
            store,
            uploader,
            config.publish.clone(),
            event_bus.clone(),
        );
        let speech = SpeechService::new(capture.clone(), config.tts_command.clone());
        Self {
            capture: Arc::new(capture),
            publish: Arc::new(publish),
            speech: Arc::new(speech),
            event_bus,
        }
    }
}
