//! Domain layer: timeline events, recordings, reconstruction and rendering.
//!
//! Everything in here is free of I/O. The persistence layer fetches rows,
//! [`timeline`] places them on a recording's clock, and [`render`] turns
//! the result into publishable text.

pub mod event;
pub mod event_bus;
pub mod hub_event;
pub mod recording;
pub mod recording_id;
pub mod render;
pub mod speech_status;
pub mod timeline;

pub use event::{CaptionEvent, MetadataEvent};
pub use event_bus::EventBus;
pub use hub_event::HubEvent;
pub use recording::{Recording, RecordingWindow};
pub use recording_id::RecordingId;
pub use speech_status::SpeechStatus;
pub use timeline::{RelativeCaption, RelativeMetadataEvent};
