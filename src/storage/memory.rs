//! In-memory session storage
//!
//! Sessions live in a `HashMap` behind an async `RwLock`. Each stored
//! session is an independent value, so concurrent sessions never share tour
//! state; the lock only guards the map itself.

use crate::error::{StorageError, StorageResult};
use crate::session::Session;
use crate::storage::SessionStore;
use crate::types::SessionId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

/// Thread-safe in-memory session store.
///
/// Cloning is cheap and clones share the same map.
///
/// # Examples
///
/// ```
/// use tour_guide::{InMemorySessionStore, Session, SessionStore};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemorySessionStore::new();
/// let session_id = store.create(Session::new()).await?;
///
/// assert!(store.exists(&session_id).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: Session) -> StorageResult<SessionId> {
        let id = session.id;
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(StorageError::AlreadyExists(format!("session {}", id)));
        }
        sessions.insert(id, session);
        trace!(session_id = %id, total = sessions.len(), "Session stored");
        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> StorageResult<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn update(&self, id: &SessionId, session: Session) -> StorageResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(slot) => {
                *slot = session;
                Ok(())
            }
            None => Err(StorageError::NotFound(format!("session {}", id))),
        }
    }

    async fn delete(&self, id: &SessionId) -> StorageResult<()> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("session {}", id)))
    }

    async fn list(&self) -> StorageResult<Vec<SessionId>> {
        Ok(self.sessions.read().await.keys().copied().collect())
    }

    async fn exists(&self, id: &SessionId) -> StorageResult<bool> {
        Ok(self.sessions.read().await.contains_key(id))
    }
}
