//! Tools module - the capabilities the model may invoke mid-conversation
//!
//! Every tool implements the [`Tool`] trait: a unique name, a description
//! the model reads to decide relevance, a JSON Schema for its arguments,
//! and an async execute method. The [`ToolRegistry`] holds the registered
//! tools, hands their definitions to the model gateway, and validates a
//! tool call's arguments against the schema before execution so malformed
//! calls are rejected up front instead of half-running.

pub mod knowledge_base;
pub mod lead_management;
pub mod schedule_meeting;

pub use knowledge_base::KnowledgeBaseTool;
pub use lead_management::{LeadManagementTool, LeadStore};
pub use schedule_meeting::ScheduleMeetingTool;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FlydeskError, Result};

/// A tool definition as presented to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub parameters: Value,
}

/// A capability the model can invoke.
///
/// Tools receive schema-validated JSON arguments and return a string
/// result that is fed back to the model verbatim.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique registry key, referenced by the model in tool calls.
    fn name(&self) -> &str;

    /// What the tool does; the model reads this to decide when to call it.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<String>;

    /// The definition handed to the model gateway.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Registry of available tools.
///
/// Immutable once the agent starts: tools are registered during wiring
/// and only read afterwards, so the registry can be shared freely across
/// concurrent chat requests.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Later registrations shadow earlier ones by name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Result<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
            .ok_or_else(|| FlydeskError::UnknownTool(name.to_string()))
    }

    /// All tool definitions, for binding into a model invocation.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Validate `args` against the named tool's schema.
    ///
    /// Returns `UnknownTool` if the name is not registered and
    /// `InvalidArguments` on a schema mismatch. The executor converts
    /// both into in-band tool results rather than letting them escape.
    pub fn validate(&self, name: &str, args: &Value) -> Result<()> {
        let tool = self.get(name)?;
        validate_against_schema(&tool.parameters(), args).map_err(|reason| {
            FlydeskError::InvalidArguments {
                tool: name.to_string(),
                reason,
            }
        })
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Check a JSON value against the subset of JSON Schema our tools use:
/// object types with `properties`, `required`, primitive `type` tags,
/// and `enum` membership. Unknown keywords are ignored.
fn validate_against_schema(schema: &Value, value: &Value) -> std::result::Result<(), String> {
    if let Some(allowed) = schema.get("enum").and_then(|e| e.as_array()) {
        if !allowed.contains(value) {
            return Err(format!(
                "value {} is not one of the allowed values {}",
                value,
                Value::Array(allowed.clone())
            ));
        }
        return Ok(());
    }

    let Some(ty) = schema.get("type").and_then(|t| t.as_str()) else {
        return Ok(());
    };

    match ty {
        "object" => {
            let Some(obj) = value.as_object() else {
                return Err(format!("expected an object, got {}", type_name(value)));
            };
            if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
                for key in required.iter().filter_map(|k| k.as_str()) {
                    if !obj.contains_key(key) {
                        return Err(format!("missing required field '{}'", key));
                    }
                }
            }
            if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
                for (key, prop_schema) in props {
                    if let Some(prop_value) = obj.get(key) {
                        validate_against_schema(prop_schema, prop_value)
                            .map_err(|e| format!("field '{}': {}", key, e))?;
                    }
                }
            }
            Ok(())
        }
        "string" => value
            .is_string()
            .then_some(())
            .ok_or_else(|| format!("expected a string, got {}", type_name(value))),
        "integer" => value
            .as_i64()
            .map(|_| ())
            .ok_or_else(|| format!("expected an integer, got {}", type_name(value))),
        "number" => value
            .is_number()
            .then_some(())
            .ok_or_else(|| format!("expected a number, got {}", type_name(value))),
        "boolean" => value
            .is_boolean()
            .then_some(())
            .ok_or_else(|| format!("expected a boolean, got {}", type_name(value))),
        "array" => value
            .is_array()
            .then_some(())
            .ok_or_else(|| format!("expected an array, got {}", type_name(value))),
        _ => Ok(()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
