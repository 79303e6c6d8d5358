//! Tool executor - runs one batch of tool calls and captures the results
//!
//! Every tool call attached to a single assistant turn is resolved
//! independently and concurrently. Failures never escape as errors: an
//! unknown tool name, a schema mismatch, an execution failure, or a
//! timeout each become the *content* of the tool-result message, so the
//! model can read what went wrong and correct itself on the next turn.
//! One failing call never aborts its siblings.

use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, warn};

use crate::conversation::{Message, ToolCall};
use crate::error::FlydeskError;
use crate::tools::ToolRegistry;

/// Executes batches of tool calls against a registry.
pub struct ToolExecutor {
    timeout: Duration,
}

impl ToolExecutor {
    /// Create an executor; `timeout` bounds each individual tool call.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Execute every call in the batch, producing exactly one tool-result
    /// message per call, correlated by call id.
    ///
    /// Calls run concurrently; results come back in input order, though
    /// the model pairs them by id so order carries no meaning.
    pub async fn execute(&self, calls: &[ToolCall], registry: &ToolRegistry) -> Vec<Message> {
        join_all(calls.iter().map(|call| self.execute_one(call, registry))).await
    }

    async fn execute_one(&self, call: &ToolCall, registry: &ToolRegistry) -> Message {
        debug!(tool = %call.name, call_id = %call.id, "executing tool call");

        let content = match self.try_execute(call, registry).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "tool call failed");
                format!("Error: {}", e)
            }
        };

        Message::tool_result(call.id.as_str(), call.name.as_str(), content)
    }

    async fn try_execute(
        &self,
        call: &ToolCall,
        registry: &ToolRegistry,
    ) -> crate::error::Result<String> {
        registry.validate(&call.name, &call.arguments)?;
        let tool = registry.get(&call.name)?;

        tokio::time::timeout(self.timeout, tool.execute(call.arguments.clone()))
            .await
            .map_err(|_| FlydeskError::Execution {
                tool: call.name.clone(),
                reason: format!("timed out after {:?}", self.timeout),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }
        fn description(&self) -> &str {
            "Uppercase the input"
        }
        fn parameters(&self) -> Value {
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })
        }
        async fn execute(&self, args: Value) -> crate::error::Result<String> {
            Ok(args["text"].as_str().unwrap_or_default().to_uppercase())
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &str {
            "failing"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _args: Value) -> crate::error::Result<String> {
            Err(FlydeskError::Execution {
                tool: "failing".to_string(),
                reason: "storage write error".to_string(),
            })
        }
    }

    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> &str {
            "slow"
        }
        fn description(&self) -> &str {
            "Sleeps"
        }
        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
        async fn execute(&self, _args: Value) -> crate::error::Result<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("done".to_string())
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(UpperTool));
        registry.register(Box::new(FailingTool));
        registry.register(Box::new(SlowTool));
        registry
    }

    fn executor() -> ToolExecutor {
        ToolExecutor::new(Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_one_result_per_call_with_matching_ids() {
        let calls = vec![
            ToolCall::new("call_a", "upper", json!({"text": "hi"})),
            ToolCall::new("call_b", "upper", json!({"text": "there"})),
            ToolCall::new("call_c", "upper", json!({"text": "friend"})),
        ];

        let results = executor().execute(&calls, &registry()).await;

        assert_eq!(results.len(), 3);
        let ids: Vec<&str> = results
            .iter()
            .map(|m| m.tool_call_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["call_a", "call_b", "call_c"]);
        assert_eq!(results[0].content, "HI");
        assert!(results.iter().all(|m| m.is_tool_result()));
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_in_band_error() {
        let calls = vec![ToolCall::new("call_1", "weather", json!({}))];
        let results = executor().execute(&calls, &registry()).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].content.contains("unknown tool 'weather'"));
        assert_eq!(results[0].tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_become_in_band_error() {
        let calls = vec![ToolCall::new("call_1", "upper", json!({"text": 5}))];
        let results = executor().execute(&calls, &registry()).await;

        assert!(results[0].content.starts_with("Error:"));
        assert!(results[0].content.contains("invalid arguments"));
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_siblings() {
        let calls = vec![
            ToolCall::new("call_1", "failing", json!({})),
            ToolCall::new("call_2", "upper", json!({"text": "ok"})),
        ];
        let results = executor().execute(&calls, &registry()).await;

        assert_eq!(results.len(), 2);
        assert!(results[0].content.contains("storage write error"));
        assert_eq!(results[1].content, "OK");
    }

    #[tokio::test]
    async fn test_timeout_is_execution_failure() {
        let calls = vec![ToolCall::new("call_1", "slow", json!({}))];
        let results = executor().execute(&calls, &registry()).await;

        assert!(results[0].content.contains("timed out"));
    }
}
