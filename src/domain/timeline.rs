//! Recording-relative timelines rebuilt from the event log.
//!
//! These functions are pure: the caller fetches events from the store and
//! hands them over together with the recording window. Nothing here
//! touches I/O, so a failed reconstruction has no side effects.

use serde::Serialize;
use utoipa::ToSchema;

use super::event::{CaptionEvent, MetadataEvent};
use super::recording::RecordingWindow;
use crate::error::HubError;

/// One metadata value placed on a recording's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RelativeMetadataEvent {
    /// Metadata value.
    pub text: String,
    /// Seconds from recording start. Negative for a value carried forward
    /// from before the recording began.
    pub start_offset_seconds: i64,
    /// Whether this entry was set before the recording started.
    pub carried_forward: bool,
}

/// One caption placed on a recording's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RelativeCaption {
    /// Spoken text.
    pub text: String,
    /// Seconds from recording start at which speech began.
    pub start_offset_seconds: i64,
    /// Seconds from recording start at which speech ended.
    pub end_offset_seconds: i64,
}

/// Places one metadata key's events on the recording timeline.
///
/// `carried` is the latest value set strictly before the window; it is
/// prepended with its true (negative) offset. `in_window` are the events
/// inserted within the window, in any order.
///
/// # Errors
///
/// Returns [`HubError::EventOutsideWindow`] if `carried` is not before the
/// window start or any `in_window` event lies outside the window.
pub fn place_metadata(
    window: RecordingWindow,
    carried: Option<MetadataEvent>,
    mut in_window: Vec<MetadataEvent>,
) -> Result<Vec<RelativeMetadataEvent>, HubError> {
    in_window.sort_by_key(|event| (event.inserted_at, event.id));

    let mut timeline = Vec::with_capacity(in_window.len().saturating_add(1));

    if let Some(prior) = carried {
        if prior.inserted_at >= window.start {
            return Err(window.violation(prior.inserted_at));
        }
        timeline.push(RelativeMetadataEvent {
            start_offset_seconds: window.offset_of(prior.inserted_at),
            text: prior.value,
            carried_forward: true,
        });
    }

    for event in in_window {
        if !window.contains(event.inserted_at) {
            return Err(window.violation(event.inserted_at));
        }
        timeline.push(RelativeMetadataEvent {
            start_offset_seconds: window.offset_of(event.inserted_at),
            text: event.value,
            carried_forward: false,
        });
    }

    Ok(timeline)
}

/// Places captions on the recording timeline.
///
/// A caption ends at its insert time and starts `ceil(duration)` seconds
/// earlier. Both offsets must fall within `[0, window length]`.
///
/// # Errors
///
/// Returns [`HubError::EventOutsideWindow`] for a caption whose start or
/// end falls outside the window.
pub fn place_captions(
    window: RecordingWindow,
    captions: Vec<CaptionEvent>,
) -> Result<Vec<RelativeCaption>, HubError> {
    let mut timeline = Vec::with_capacity(captions.len());

    for caption in captions {
        let end_offset = window.offset_of(caption.inserted_at);
        let start_offset = end_offset - caption.whole_duration_seconds();
        if start_offset < 0 {
            return Err(window.violation(window.start + start_offset));
        }
        if end_offset > window.length() {
            return Err(window.violation(caption.inserted_at));
        }
        timeline.push(RelativeCaption {
            text: caption.text,
            start_offset_seconds: start_offset,
            end_offset_seconds: end_offset,
        });
    }

    timeline.sort_by_key(|c| (c.start_offset_seconds, c.end_offset_seconds));
    Ok(timeline)
}
