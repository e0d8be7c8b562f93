//! Session storage backends
//!
//! The tour service only needs whole-session reads and writes: it loads a
//! session, runs one tool call against a copy, and writes the result back in
//! a single `update`.

use crate::error::StorageResult;
use crate::session::Session;
use crate::types::SessionId;
use async_trait::async_trait;

pub mod memory;

/// Trait for session storage backends
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session; fails if the ID is already taken
    async fn create(&self, session: Session) -> StorageResult<SessionId>;

    /// Get a snapshot of a session, `None` if unknown
    async fn get(&self, id: &SessionId) -> StorageResult<Option<Session>>;

    /// Replace an existing session; fails if the ID is unknown
    async fn update(&self, id: &SessionId, session: Session) -> StorageResult<()>;

    /// Drop a session and everything it holds
    async fn delete(&self, id: &SessionId) -> StorageResult<()>;

    async fn list(&self) -> StorageResult<Vec<SessionId>>;

    async fn exists(&self, id: &SessionId) -> StorageResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
