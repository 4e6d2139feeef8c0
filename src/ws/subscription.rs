//! Per-connection subscription manager.
//!
//! Tracks which event types a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::BTreeSet;

use crate::domain::HubEvent;

/// Wildcard event type selecting every event.
pub const WILDCARD: &str = "*";

/// Manages the set of event-type subscriptions for a single WebSocket
/// connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed event types. Ignored while `subscribe_all` is set.
    event_types: BTreeSet<&'static str>,
    /// Whether the client subscribes to every event (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds event types to the subscription set and returns the names that
    /// were not recognised.
    pub fn subscribe<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<String> {
        let mut unknown = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name == WILDCARD {
                self.subscribe_all = true;
            } else if let Some(known) = canonical(name) {
                self.event_types.insert(known);
            } else {
                unknown.push(name.to_string());
            }
        }
        unknown
    }

    /// Removes event types from the subscription set.
    pub fn unsubscribe<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            if name == WILDCARD {
                self.subscribe_all = false;
            } else {
                self.event_types.remove(name);
            }
        }
    }

    /// Returns `true` if the event passes the subscription filter.
    #[must_use]
    pub fn matches(&self, event: &HubEvent) -> bool {
        self.subscribe_all || self.event_types.contains(event.event_type_str())
    }

    /// Explicitly subscribed event types, sorted.
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.event_types.iter().copied().collect()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

fn canonical(name: &str) -> Option<&'static str> {
    HubEvent::TYPES.iter().copied().find(|known| *known == name)
}
