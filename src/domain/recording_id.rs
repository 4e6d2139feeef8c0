//! Type-safe recording identifier.
//!
//! [`RecordingId`] is a newtype wrapper around the registry's `BIGSERIAL`
//! row id so that recording identifiers cannot be confused with event ids
//! or timestamps, which are also plain `i64`s.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier for a recording session.
///
/// Assigned by the recording registry at insert time and immutable
/// thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RecordingId(i64);

impl RecordingId {
    /// Wraps a raw registry id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw registry id.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordingId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<RecordingId> for i64 {
    fn from(id: RecordingId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_number() {
        assert_eq!(RecordingId::new(42).to_string(), "42");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&RecordingId::new(9)).unwrap_or_default();
        assert_eq!(json, "9");
    }

    #[test]
    fn orders_by_raw_id() {
        assert!(RecordingId::new(1) < RecordingId::new(2));
        assert_eq!(i64::from(RecordingId::from(5)), 5);
    }
}
