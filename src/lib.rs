//! # stream-hub
//!
//! Control hub for a live-streaming setup. While a broadcast runs the hub
//! records every change of stream metadata (task, category, title, tags)
//! and every spoken caption with a store-assigned timestamp. When a
//! recording finishes it reconstructs what was in effect during that
//! recording and renders the publication package: a composite title, a
//! chaptered description, a subtitle document and a tag list.
//!
//! ## Architecture
//!
//! ```text
//! Clients (control panel, overlays)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── CaptureService / PublishService / SpeechService (service/)
//!     ├── TimelineReconstructor (service/)
//!     ├── Timeline placement + rendering, EventBus (domain/)
//!     │
//!     ├── TimelineStore: PostgreSQL or in-memory (persistence/)
//!     └── VideoUploader (upload/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod upload;
pub mod ws;
