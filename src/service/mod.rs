//! Service layer: business logic orchestration.
//!
//! [`CaptureService`] owns the live write path, [`TimelineReconstructor`]
//! turns stored events into recording-relative timelines,
//! [`PublishService`] renders and uploads finished recordings, and
//! [`SpeechService`] drives text-to-speech. Every mutation is announced on
//! the [`super::domain::EventBus`].

pub mod capture_service;
pub mod publish_service;
pub mod speech_service;
pub mod timeline_service;

pub use capture_service::CaptureService;
pub use publish_service::{PublicationPackage, PublishOutcome, PublishService};
pub use speech_service::SpeechService;
pub use timeline_service::TimelineReconstructor;
