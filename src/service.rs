//! Session-aware entry point for an agent runtime
//!
//! [`TourService`] ties the tool registry to a session store. Every tool call
//! loads one session, runs against a copy of its tour state and, only on
//! success, writes the new state and a transcript entry back in a single
//! store update.

use crate::controller::TourController;
use crate::error::{Result, TourError};
use crate::session::Session;
use crate::storage::memory::InMemorySessionStore;
use crate::storage::SessionStore;
use crate::tool::{Tool, ToolRegistry, ToolResult};
use crate::tour_tools::register_tour_tools;
use crate::transcript::Message;
use crate::types::SessionId;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tour tools bound to per-session state
pub struct TourService {
    controller: Arc<TourController>,
    registry: ToolRegistry,
    session_store: Arc<dyn SessionStore>,
    session_ttl: Option<Duration>,
}

impl TourService {
    pub fn builder() -> TourServiceBuilder {
        TourServiceBuilder::new()
    }

    pub fn controller(&self) -> &Arc<TourController> {
        &self.controller
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Register an extra tool next to the built-in ones
    pub async fn add_tool(&self, tool: Arc<dyn Tool>) -> Result<crate::types::ToolId> {
        self.registry.register(tool).await
    }

    /// Tool schemas to advertise to the LLM runtime
    pub async fn tool_schemas(&self) -> Vec<Value> {
        self.registry.schemas().await
    }

    /// Start a session with an empty catalog and tour
    pub async fn create_session(&self) -> Result<SessionId> {
        let mut session = Session::new();
        if let Some(ttl) = self.session_ttl {
            session = session.with_expiration(Utc::now() + ttl);
        }
        let session_id = self.session_store.create(session).await?;
        info!(session_id = %session_id, "Session created");
        Ok(session_id)
    }

    /// Snapshot of a session, `None` if unknown
    pub async fn session(&self, session_id: &SessionId) -> Result<Option<Session>> {
        Ok(self.session_store.get(session_id).await?)
    }

    /// End a session, dropping its catalog and tour
    pub async fn end_session(&self, session_id: &SessionId) -> Result<()> {
        self.session_store
            .delete(session_id)
            .await
            .map_err(|_| TourError::SessionNotFound(*session_id))?;
        info!(session_id = %session_id, "Session ended");
        Ok(())
    }

    /// Append a user or assistant message to the transcript
    pub async fn record_message(&self, session_id: &SessionId, message: Message) -> Result<()> {
        let mut session = self.load_active(session_id).await?;
        session.record(message);
        self.session_store.update(session_id, session).await?;
        Ok(())
    }

    /// Run a tool against a session's tour state.
    ///
    /// Tour failures (nothing found, empty tour, lookup errors and the like)
    /// come back as a [`ToolResult`] with `error` set and leave the session
    /// untouched. Unknown sessions, unknown tools and malformed parameters are
    /// returned as `Err`.
    pub async fn call_tool(
        &self,
        session_id: &SessionId,
        tool_name: &str,
        parameters: HashMap<String, Value>,
    ) -> Result<ToolResult> {
        let mut session = self.load_active(session_id).await?;

        let effect = match self
            .registry
            .execute(tool_name, &session.state, parameters)
            .await
        {
            Ok(effect) => effect,
            Err(err) if is_caller_error(&err) => return Err(err),
            Err(err) => {
                warn!(
                    session_id = %session_id,
                    tool_name = %tool_name,
                    error_kind = err.kind(),
                    error = %err,
                    "Tool call failed"
                );
                let mut metadata = HashMap::new();
                metadata.insert("tool".to_string(), json!(tool_name));
                metadata.insert("error_kind".to_string(), json!(err.kind()));
                return Ok(ToolResult {
                    output: Value::Null,
                    error: Some(err.to_string()),
                    metadata,
                });
            }
        };

        let message = Message::tool(effect.message.clone()).with_metadata("tool", json!(tool_name));
        match effect.state {
            Some(state) => session.apply(state, message),
            None => session.record(message),
        }
        self.session_store.update(session_id, session).await?;

        debug!(session_id = %session_id, tool_name = %tool_name, "Tool call committed");

        let mut metadata = HashMap::new();
        metadata.insert("tool".to_string(), json!(tool_name));
        metadata.insert("message".to_string(), json!(effect.message));
        Ok(ToolResult {
            output: effect.output,
            error: None,
            metadata,
        })
    }

    async fn load_active(&self, session_id: &SessionId) -> Result<Session> {
        let session = self
            .session_store
            .get(session_id)
            .await?
            .ok_or(TourError::SessionNotFound(*session_id))?;
        if session.is_expired() {
            warn!(session_id = %session_id, "Rejected call on expired session");
            return Err(TourError::SessionExpired(*session_id));
        }
        Ok(session)
    }
}

/// Errors that mean the call itself was wrong rather than the tour operation
fn is_caller_error(err: &TourError) -> bool {
    matches!(
        err,
        TourError::ToolNotFound(_)
            | TourError::InvalidToolParameters { .. }
            | TourError::Storage(_)
            | TourError::Serialization(_)
            | TourError::Internal(_)
    )
}

/// Builder for creating a tour service
pub struct TourServiceBuilder {
    controller: Option<Arc<TourController>>,
    session_store: Option<Arc<dyn SessionStore>>,
    session_ttl: Option<Duration>,
}

impl TourServiceBuilder {
    pub fn new() -> Self {
        Self {
            controller: None,
            session_store: None,
            session_ttl: None,
        }
    }

    pub fn controller(mut self, controller: Arc<TourController>) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Sessions created by the service expire after `ttl`
    pub fn session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    pub async fn build(self) -> Result<TourService> {
        let controller = self
            .controller
            .ok_or_else(|| TourError::Configuration("tour controller is required".to_string()))?;

        if let Some(ttl) = self.session_ttl {
            if ttl <= Duration::zero() {
                return Err(TourError::Configuration(
                    "session ttl must be positive".to_string(),
                ));
            }
        }

        let session_store = self
            .session_store
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));

        let registry = ToolRegistry::new();
        let tool_ids = register_tour_tools(&registry, controller.clone()).await?;
        debug!(tools = tool_ids.len(), "Built-in tools registered");

        Ok(TourService {
            controller,
            registry,
            session_store,
            session_ttl: self.session_ttl,
        })
    }
}

impl Default for TourServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
