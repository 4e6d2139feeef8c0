//! Shared "currently speaking" indicator for the avatar overlay.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a text-to-speech operation is in flight.
///
/// Cheap to clone; every clone observes the same flag.
#[derive(Debug, Clone, Default)]
pub struct SpeechStatus {
    speaking: Arc<AtomicBool>,
}

impl SpeechStatus {
    /// Creates a status that is not speaking.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a speech guard is alive.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Acquire)
    }

    /// Marks speech as started. The flag clears when the guard drops,
    /// including on early return or panic unwinding.
    ///
    /// Returns `None` if speech is already in flight.
    #[must_use]
    pub fn begin(&self) -> Option<SpeakingGuard> {
        self.speaking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SpeakingGuard {
                speaking: Arc::clone(&self.speaking),
            })
    }
}

/// Clears the speaking flag on drop.
#[derive(Debug)]
pub struct SpeakingGuard {
    speaking: Arc<AtomicBool>,
}

impl Drop for SpeakingGuard {
    fn drop(&mut self) {
        self.speaking.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_sets_and_clears_flag() {
        let status = SpeechStatus::new();
        assert!(!status.is_speaking());
        {
            let guard = status.begin();
            assert!(guard.is_some());
            assert!(status.clone().is_speaking());
        }
        assert!(!status.is_speaking());
    }

    #[test]
    fn second_begin_is_refused_while_speaking() {
        let status = SpeechStatus::new();
        let first = status.begin();
        assert!(first.is_some());
        assert!(status.begin().is_none());
        drop(first);
        assert!(status.begin().is_some());
    }
}
