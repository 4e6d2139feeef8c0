//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes live [`crate::domain::HubEvent`]s
//! to overlay and control-panel clients. Clients choose which event types
//! they receive with `subscribe` and `unsubscribe` commands.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
