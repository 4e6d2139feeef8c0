//! Stored timeline events: free-form metadata and spoken captions.
//!
//! Both kinds are append-only. `inserted_at` is stamped by the store in
//! Unix seconds and never supplied by callers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Well-known metadata keys written by the control panel.
///
/// The key vocabulary is open: anything may be recorded, these are the
/// keys the publication flow reads.
pub mod keys {
    /// On-screen task text; drives chapter marks.
    pub const TASK: &str = "task";
    /// Streaming-platform category.
    pub const CATEGORY: &str = "category";
    /// Stream title.
    pub const TITLE: &str = "title";
    /// Stream description.
    pub const DESCRIPTION: &str = "description";
    /// Comma-separated tag list.
    pub const TAGS: &str = "tags";
}

/// A `(key, value)` metadata entry.
///
/// Keys are not unique: every historical value is kept and ordered by
/// `inserted_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetadataEvent {
    /// Store row id.
    pub id: i64,
    /// Metadata key, e.g. `"task"`.
    pub key: String,
    /// Value as written.
    pub value: String,
    /// Insert time in Unix seconds.
    pub inserted_at: i64,
}

/// A spoken caption.
///
/// `inserted_at` marks when the utterance *finished*; the utterance began
/// `duration_seconds` earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CaptionEvent {
    /// Store row id.
    pub id: i64,
    /// Spoken text.
    pub text: String,
    /// How long the utterance took, in seconds.
    pub duration_seconds: f64,
    /// Utterance end time in Unix seconds.
    pub inserted_at: i64,
}

impl CaptionEvent {
    /// Duration rounded up to whole seconds, the subtitle grid resolution.
    #[must_use]
    pub fn whole_duration_seconds(&self) -> i64 {
        #[allow(clippy::cast_possible_truncation)]
        let secs = self.duration_seconds.max(0.0).ceil() as i64;
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caption(duration_seconds: f64) -> CaptionEvent {
        CaptionEvent {
            id: 1,
            text: "hello".to_string(),
            duration_seconds,
            inserted_at: 1050,
        }
    }

    #[test]
    fn duration_rounds_up() {
        assert_eq!(caption(2.4).whole_duration_seconds(), 3);
        assert_eq!(caption(2.0).whole_duration_seconds(), 2);
        assert_eq!(caption(0.01).whole_duration_seconds(), 1);
    }

    #[test]
    fn zero_duration_stays_zero() {
        assert_eq!(caption(0.0).whole_duration_seconds(), 0);
    }
}
