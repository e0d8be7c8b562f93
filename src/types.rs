//! Common identifier types used throughout the crate
//!
//! Session, message and tool identifiers are UUID newtypes so they cannot be
//! mixed up at call sites. Place identifiers come from the Places service and
//! stay opaque strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a conversation session
    SessionId
);

uuid_id!(
    /// Unique identifier for a transcript message
    MessageId
);

uuid_id!(
    /// Unique identifier for a registered tool
    ToolId
);

/// Opaque identifier assigned to a place by the Places service.
///
/// Stable across lookups for the same physical place, but never used as the
/// catalog key: user-facing operations address places by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PlaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PlaceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2, "SessionIds should be unique");
    }

    #[test]
    fn test_ids_from_uuid() {
        let uuid = Uuid::new_v4();

        assert_eq!(SessionId::from(uuid).as_uuid(), &uuid);
        assert_eq!(MessageId::from(uuid).as_uuid(), &uuid);
        assert_eq!(ToolId::from(uuid).as_uuid(), &uuid);
    }

    #[test]
    fn test_session_id_serialization() {
        let id = SessionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_place_id_is_transparent_in_json() {
        let id = PlaceId::new("ChIJrRMgU7ZhLxMRxAOFkC7I8Sg");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ChIJrRMgU7ZhLxMRxAOFkC7I8Sg\"");
        assert_eq!(id.to_string(), "ChIJrRMgU7ZhLxMRxAOFkC7I8Sg");
    }
}
