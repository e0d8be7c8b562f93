//! Conversation sessions
//!
//! A session owns one tour state and one transcript. Nothing in it is shared
//! with other sessions; it is created empty and dropped when the session
//! ends.

use crate::tour::TourState;
use crate::transcript::Message;
use crate::types::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A conversation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Place catalog and tour list
    pub state: TourState,
    /// Messages exchanged so far, tool outcomes included
    pub transcript: Vec<Message>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session with an empty catalog and tour
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            state: TourState::new(),
            transcript: Vec::new(),
            metadata: HashMap::new(),
            created_at: now,
            updated_at: now,
            expires_at: None,
        }
    }

    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| Utc::now() > expires_at)
            .unwrap_or(false)
    }

    /// Replace the tour state and log the outcome in the transcript
    pub fn apply(&mut self, state: TourState, message: Message) {
        self.state = state;
        self.transcript.push(message);
        self.touch();
    }

    pub fn record(&mut self, message: Message) {
        self.transcript.push(message);
        self.touch();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::{Location, PlaceRecord};
    use chrono::Duration;

    #[test]
    fn test_session_starts_empty() {
        let session = Session::new();
        assert!(session.state.catalog.is_empty());
        assert!(session.state.tour.is_empty());
        assert!(session.transcript.is_empty());
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_expiration() {
        let session = Session::new().with_expiration(Utc::now() - Duration::hours(1));
        assert!(session.is_expired());

        let session = Session::new().with_expiration(Utc::now() + Duration::hours(24));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_apply_replaces_state_and_records_message() {
        let mut session = Session::new();
        let before = session.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));

        let mut state = TourState::new();
        state
            .catalog
            .upsert(PlaceRecord::new("p", "Colosseum", Location::new(41.8902, 12.4923)));
        state.tour.push("Colosseum");

        session.apply(state.clone(), Message::tool("Added 'Colosseum'"));

        assert_eq!(session.state, state);
        assert_eq!(session.transcript.len(), 1);
        assert!(session.updated_at > before);
    }

    #[test]
    fn test_session_serialization_roundtrip() {
        let mut session = Session::new().with_metadata("user_id", serde_json::json!("u-1"));
        session.state.catalog.upsert(PlaceRecord::new(
            "p",
            "Pantheon",
            Location::new(41.8986, 12.4769),
        ));
        session.state.tour.push("Pantheon");

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.id, session.id);
        assert_eq!(restored.state, session.state);
        assert_eq!(restored.metadata, session.metadata);
    }
}
