//! Tool integration for the orchestration layer
//!
//! A [`Tool`] wraps one tour operation behind a name, a description and a
//! parameter schema an LLM runtime can advertise. Tools never keep state of
//! their own: they read the session's [`TourState`] and describe the new one
//! in a [`ToolEffect`].

use crate::error::{Result, TourError};
use crate::tour::TourState;
use crate::types::ToolId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};

/// Parameter schema definition for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub param_type: String,
    pub required: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParameterSchema {
    pub fn required(param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            required: true,
            description: description.into(),
            default: None,
        }
    }

    pub fn optional(param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(param_type, description)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// What a tool call produced
#[derive(Debug, Clone, PartialEq)]
pub struct ToolEffect {
    /// Structured payload for the orchestration layer
    pub output: Value,
    /// User-facing summary
    pub message: String,
    /// New tour state, `None` when the call only read the state
    pub state: Option<TourState>,
}

/// Result of a tool call as reported to the orchestration layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub output: Value,
    pub error: Option<String>,
    pub metadata: HashMap<String, Value>,
}

impl ToolResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Stable tag of the failure, if any
    pub fn error_kind(&self) -> Option<&str> {
        self.metadata.get("error_kind").and_then(Value::as_str)
    }
}

/// Trait for tools that can be executed against a tour state
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn id(&self) -> &ToolId;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters(&self) -> &HashMap<String, ParameterSchema>;

    /// Run the tool. Must not assume parameters were validated unless called
    /// through [`ToolRegistry::execute`].
    async fn execute(&self, state: &TourState, parameters: HashMap<String, Value>) -> Result<ToolEffect>;

    /// Validate parameters before execution
    fn validate_parameters(&self, parameters: &HashMap<String, Value>) -> Result<()> {
        trace!(tool_name = %self.name(), "Validating tool parameters");

        let schema = self.parameters();

        for (param_name, param_schema) in schema {
            if param_schema.required && !parameters.contains_key(param_name) {
                warn!(
                    tool_name = %self.name(),
                    param_name = %param_name,
                    "Missing required parameter"
                );
                return Err(TourError::InvalidToolParameters {
                    tool_name: self.name().to_string(),
                    reason: format!("Missing required parameter: {}", param_name),
                });
            }
        }

        for (param_name, value) in parameters {
            match schema.get(param_name) {
                Some(param_schema) if !validate_type(value, &param_schema.param_type) => {
                    warn!(
                        tool_name = %self.name(),
                        param_name = %param_name,
                        expected_type = %param_schema.param_type,
                        "Parameter type mismatch"
                    );
                    return Err(TourError::InvalidToolParameters {
                        tool_name: self.name().to_string(),
                        reason: format!(
                            "Parameter '{}' has wrong type, expected {}",
                            param_name, param_schema.param_type
                        ),
                    });
                }
                Some(_) => {}
                None => {
                    return Err(TourError::InvalidToolParameters {
                        tool_name: self.name().to_string(),
                        reason: format!("Unknown parameter: {}", param_name),
                    });
                }
            }
        }

        Ok(())
    }

    /// Fill in schema defaults for parameters the caller left out
    fn apply_defaults(&self, parameters: &mut HashMap<String, Value>) {
        for (param_name, param_schema) in self.parameters() {
            if let Some(default_value) = &param_schema.default {
                parameters
                    .entry(param_name.clone())
                    .or_insert_with(|| default_value.clone());
            }
        }
    }

    /// JSON description advertised to the LLM runtime
    fn schema(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "parameters": self.parameters(),
        })
    }
}

/// Validate a JSON value against a type string
fn validate_type(value: &Value, expected_type: &str) -> bool {
    match expected_type {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

/// Fetch a string parameter, rejecting a missing or non-string value
pub(crate) fn string_param<'a>(
    tool: &dyn Tool,
    parameters: &'a HashMap<String, Value>,
    name: &str,
) -> Result<&'a str> {
    parameters
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| TourError::InvalidToolParameters {
            tool_name: tool.name().to_string(),
            reason: format!("'{}' must be a string", name),
        })
}

/// Registry of tools addressable by name
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<ToolId, Arc<dyn Tool>>>>,
    tools_by_name: Arc<RwLock<HashMap<String, ToolId>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Arc::new(RwLock::new(HashMap::new())),
            tools_by_name: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a tool; names must be unique
    pub async fn register(&self, tool: Arc<dyn Tool>) -> Result<ToolId> {
        let tool_id = *tool.id();
        let tool_name = tool.name().to_string();

        let mut tools = self.tools.write().await;
        let mut tools_by_name = self.tools_by_name.write().await;

        if tools_by_name.contains_key(&tool_name) {
            warn!(tool_name = %tool_name, "Attempted to register duplicate tool");
            return Err(TourError::ToolAlreadyRegistered(tool_name));
        }

        tools.insert(tool_id, tool);
        tools_by_name.insert(tool_name.clone(), tool_id);

        debug!(
            tool_id = %tool_id,
            tool_name = %tool_name,
            total_tools = tools.len(),
            "Tool registered"
        );
        Ok(tool_id)
    }

    pub async fn get_by_name(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tool_id = *self.tools_by_name.read().await.get(name)?;
        self.tools.read().await.get(&tool_id).cloned()
    }

    /// All tools, sorted by name
    pub async fn list(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<_> = self.tools.read().await.values().cloned().collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
    }

    /// JSON schemas of every registered tool, sorted by name
    pub async fn schemas(&self) -> Vec<Value> {
        self.list().await.iter().map(|tool| tool.schema()).collect()
    }

    /// Look up a tool by name, apply defaults, validate and run it
    pub async fn execute(
        &self,
        name: &str,
        state: &TourState,
        mut parameters: HashMap<String, Value>,
    ) -> Result<ToolEffect> {
        let tool = self
            .get_by_name(name)
            .await
            .ok_or_else(|| TourError::ToolNotFound(name.to_string()))?;

        info!(tool_name = %name, param_count = parameters.len(), "Executing tool");

        tool.apply_defaults(&mut parameters);
        tool.validate_parameters(&parameters)?;

        let effect = tool.execute(state, parameters).await?;

        debug!(
            tool_name = %name,
            state_changed = effect.state.is_some(),
            "Tool execution completed"
        );
        Ok(effect)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
