//! Text-to-speech: speak a line aloud and caption it.

use std::time::Instant;

use chrono::Utc;
use tokio::process::Command;

use super::CaptureService;
use crate::domain::{CaptionEvent, HubEvent, SpeechStatus};
use crate::error::HubError;

/// Runs the configured TTS program and records what was said as a
/// caption lasting as long as the program ran.
///
/// Only one utterance is in flight at a time; [`SpeechStatus`] is shared
/// with the overlay status endpoint.
#[derive(Debug, Clone)]
pub struct SpeechService {
    capture: CaptureService,
    status: SpeechStatus,
    command: String,
}

impl SpeechService {
    /// Creates a new `SpeechService`. `command` is split on whitespace; the
    /// text is appended as the final argument.
    #[must_use]
    pub fn new(capture: CaptureService, command: impl Into<String>) -> Self {
        Self {
            capture,
            status: SpeechStatus::new(),
            command: command.into(),
        }
    }

    /// Shared speaking indicator.
    #[must_use]
    pub fn status(&self) -> &SpeechStatus {
        &self.status
    }

    /// Speaks `text` and records it as a caption.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::InvalidRequest`] for blank text or while another
    /// utterance is in flight, [`HubError::SpeechFailed`] if the program
    /// cannot start or exits unsuccessfully, and any
    /// [`CaptureService::record_caption`] error.
    pub async fn speak(&self, text: &str) -> Result<CaptionEvent, HubError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(HubError::InvalidRequest("speech text must not be empty".to_string()));
        }
        let Some(_guard) = self.status.begin() else {
            return Err(HubError::InvalidRequest("speech already in progress".to_string()));
        };

        let bus = self.capture.event_bus();
        let _ = bus.publish(HubEvent::SpeechStarted {
            text: text.to_string(),
            timestamp: Utc::now(),
        });

        let started = Instant::now();
        let result = self.run(text).await;
        let elapsed = started.elapsed().as_secs_f64();

        let _ = bus.publish(HubEvent::SpeechFinished {
            success: result.is_ok(),
            timestamp: Utc::now(),
        });
        result?;

        tracing::debug!(elapsed, "speech finished");
        self.capture.record_caption(text, elapsed).await
    }

    async fn run(&self, text: &str) -> Result<(), HubError> {
        let mut parts = self.command.split_whitespace();
        let Some(program) = parts.next() else {
            return Err(HubError::SpeechFailed("no speech command configured".to_string()));
        };

        let output = Command::new(program)
            .args(parts)
            .arg(text)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| HubError::SpeechFailed(format!("cannot run {program}: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(%program, status = %output.status, %stderr, "speech command failed");
            Err(HubError::SpeechFailed(format!(
                "{program} exited with {}",
                output.status
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::EventBus;
    use crate::persistence::{MemoryStore, TimelineStore};

    fn make_service(command: &str) -> (SpeechService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let dyn_store: Arc<dyn TimelineStore> = Arc::clone(&store) as Arc<dyn TimelineStore>;
        let capture = CaptureService::new(dyn_store, EventBus::new(16));
        (SpeechService::new(capture, command), store)
    }

    #[tokio::test]
    async fn successful_speech_is_captioned() {
        let (service, store) = make_service("true");
        let Ok(caption) = service.speak("  good morning  ").await else {
            panic!("speak failed");
        };
        assert_eq!(caption.text, "good morning");
        assert!(caption.duration_seconds >= 0.0);
        assert!(!service.status().is_speaking());

        let Ok(stored) = store.captions_in_range(i64::MIN, i64::MAX).await else {
            panic!("range query failed");
        };
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn failing_command_records_nothing() {
        let (service, store) = make_service("false");
        let mut rx = service.capture.event_bus().subscribe();

        let result = service.speak("hello").await;
        assert!(matches!(result, Err(HubError::SpeechFailed(_))));
        assert!(!service.status().is_speaking());

        let Ok(HubEvent::SpeechStarted { .. }) = rx.recv().await else {
            panic!("expected SpeechStarted");
        };
        let Ok(HubEvent::SpeechFinished { success, .. }) = rx.recv().await else {
            panic!("expected SpeechFinished");
        };
        assert!(!success);
        assert!(
            store
                .captions_in_range(i64::MIN, i64::MAX)
                .await
                .is_ok_and(|c| c.is_empty())
        );
    }

    #[tokio::test]
    async fn missing_program_is_speech_failure() {
        let (service, _) = make_service("stream-hub-no-such-tts-binary");
        let result = service.speak("hello").await;
        assert!(matches!(result, Err(HubError::SpeechFailed(_))));
    }

    #[tokio::test]
    async fn busy_speaker_refuses() {
        let (service, _) = make_service("true");
        let _guard = service.status().begin();
        let result = service.speak("hello").await;
        assert!(matches!(result, Err(HubError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn blank_text_rejected() {
        let (service, _) = make_service("true");
        let result = service.speak("   ").await;
        assert!(matches!(result, Err(HubError::InvalidRequest(_))));
    }
}
