//! The orchestration loop.
//!
//! An explicit two-state machine over one conversation:
//!
//! - `AwaitingModel`: invoke the gateway with the full history. If the
//!   assistant message carries tool calls, move to `AwaitingTools`;
//!   otherwise the message is the final reply.
//! - `AwaitingTools`: execute the whole batch, append one tool result per
//!   call, and go back to `AwaitingModel`.
//!
//! The model is never re-invoked until every tool call from the current
//! turn has a matching result in the conversation. A configurable turn
//! bound stops a model that keeps requesting tools forever.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::conversation::{Conversation, Message, ToolCall};
use crate::error::{FlydeskError, Result};
use crate::providers::ModelGateway;
use crate::tools::ToolRegistry;

use super::executor::ToolExecutor;

/// Limits for one orchestration run.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum number of model invocations per run.
    pub max_turns: u32,
    /// Timeout for one model invocation.
    pub model_timeout: Duration,
    /// Timeout for one tool call.
    pub tool_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            model_timeout: Duration::from_secs(60),
            tool_timeout: Duration::from_secs(30),
        }
    }
}

enum LoopState {
    AwaitingModel,
    AwaitingTools(Vec<ToolCall>),
    Done(Message),
}

/// The agent loop: alternates model invocations and tool execution until
/// the model produces a final reply.
///
/// Dependencies are injected, not ambient: construct it with whatever
/// gateway and registry the caller wants, including test doubles. The
/// loop itself is stateless across runs and can serve concurrent chat
/// requests; each run owns its conversation exclusively.
pub struct AgentLoop {
    gateway: Arc<dyn ModelGateway>,
    registry: Arc<ToolRegistry>,
    executor: ToolExecutor,
    config: AgentConfig,
}

impl AgentLoop {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        registry: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        let executor = ToolExecutor::new(config.tool_timeout);
        Self {
            gateway,
            registry,
            executor,
            config,
        }
    }

    /// Run the loop to completion over `conversation`.
    ///
    /// Returns the final assistant message. Fatal outcomes:
    /// `ExceededMaxTurns` if the turn bound is hit, `ModelUnavailable` if
    /// the gateway fails or times out, `Cancelled` if `cancel` fires
    /// between steps. Tool failures are not fatal; they are fed back to
    /// the model as tool-result content.
    pub async fn run(
        &self,
        mut conversation: Conversation,
        cancel: CancellationToken,
    ) -> Result<Message> {
        let mut state = LoopState::AwaitingModel;
        let mut turns: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(FlydeskError::Cancelled);
            }

            state = match state {
                LoopState::AwaitingModel => {
                    if turns >= self.config.max_turns {
                        return Err(FlydeskError::ExceededMaxTurns(self.config.max_turns));
                    }
                    turns += 1;

                    let response = self.invoke_model(&conversation, &cancel).await?;
                    conversation.push(response.clone());

                    if response.has_tool_calls() {
                        debug!(
                            turn = turns,
                            calls = response.tool_calls.len(),
                            "model requested tools"
                        );
                        LoopState::AwaitingTools(response.tool_calls)
                    } else {
                        LoopState::Done(response)
                    }
                }
                LoopState::AwaitingTools(calls) => {
                    let results = self.executor.execute(&calls, &self.registry).await;
                    conversation.extend(results);
                    LoopState::AwaitingModel
                }
                LoopState::Done(message) => {
                    info!(turns, "orchestration complete");
                    return Ok(message);
                }
            };
        }
    }

    async fn invoke_model(
        &self,
        conversation: &Conversation,
        cancel: &CancellationToken,
    ) -> Result<Message> {
        let tools = self.registry.definitions();
        let invocation = tokio::time::timeout(
            self.config.model_timeout,
            self.gateway.invoke(conversation.messages(), &tools),
        );

        tokio::select! {
            _ = cancel.cancelled() => Err(FlydeskError::Cancelled),
            result = invocation => match result {
                Ok(response) => response,
                Err(_) => Err(FlydeskError::ModelUnavailable(format!(
                    "model call timed out after {:?}",
                    self.config.model_timeout
                ))),
            },
        }
    }
}
