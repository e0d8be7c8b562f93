//! Error types for tour operations
//!
//! Every failure in this crate is recoverable by the caller. The orchestration
//! layer is expected to turn these into a natural-language explanation rather
//! than abort the session.

use crate::types::SessionId;
use std::time::Duration;
use thiserror::Error;

/// Main error type for tour operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TourError {
    /// Talking to an external lookup service failed
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// A text query succeeded but matched nothing
    #[error("No place found for '{query}'")]
    PlaceNotFound { query: String },

    /// A direct catalog lookup by display name missed
    #[error("Place not found in catalog: {0}")]
    NotFound(String),

    /// The tour has no stops
    #[error("The tour is empty")]
    EmptyTour,

    /// The named place is not part of the tour
    #[error("Place '{name}' is not in the tour; current tour: {tour:?}")]
    PlaceNotInTour { name: String, tour: Vec<String> },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Session expired
    #[error("Session expired: {0}")]
    SessionExpired(SessionId),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Tool not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool already registered with same name
    #[error("Tool already registered: {0}")]
    ToolAlreadyRegistered(String),

    /// Invalid tool parameters
    #[error("Invalid tool parameters for {tool_name}: {reason}")]
    InvalidToolParameters { tool_name: String, reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal invariant violation (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TourError {
    /// Stable snake_case tag for the error variant.
    ///
    /// Attached to failed tool results so callers can branch on the kind of
    /// failure without parsing the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lookup(LookupError::Timeout { .. }) => "lookup_timeout",
            Self::Lookup(_) => "lookup_failed",
            Self::PlaceNotFound { .. } => "place_not_found",
            Self::NotFound(_) => "not_found",
            Self::EmptyTour => "empty_tour",
            Self::PlaceNotInTour { .. } => "place_not_in_tour",
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "configuration",
            Self::SessionNotFound(_) => "session_not_found",
            Self::SessionExpired(_) => "session_expired",
            Self::Storage(_) => "storage",
            Self::ToolNotFound(_) => "tool_not_found",
            Self::ToolAlreadyRegistered(_) => "tool_already_registered",
            Self::InvalidToolParameters { .. } => "invalid_tool_parameters",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

/// Failures talking to the Places or Routes collaborators.
///
/// `context` names what was being looked up (the query text or the
/// coordinates) so the caller can retry by hand.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LookupError {
    /// The request did not complete within the configured timeout
    #[error("{context}: timed out after {timeout:?}")]
    Timeout { context: String, timeout: Duration },

    /// Connection, TLS or other transport-level failure
    #[error("{context}: transport error: {message}")]
    Transport { context: String, message: String },

    /// The service answered with a non-success status
    #[error("{context}: HTTP {status}: {body}")]
    Status {
        context: String,
        status: u16,
        body: String,
    },

    /// The response body did not match the expected schema
    #[error("{context}: malformed response: {message}")]
    Malformed { context: String, message: String },
}

impl LookupError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// What was being looked up when the failure happened
    pub fn context(&self) -> &str {
        match self {
            Self::Timeout { context, .. }
            | Self::Transport { context, .. }
            | Self::Status { context, .. }
            | Self::Malformed { context, .. } => context,
        }
    }
}

/// Storage-related errors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StorageError {
    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),
}

/// Type alias for crate results
pub type Result<T> = std::result::Result<T, TourError>;

/// Type alias for Storage Result
pub type StorageResult<T> = std::result::Result<T, StorageError>;
