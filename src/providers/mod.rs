//! Providers module - the boundary to the language model
//!
//! [`ModelGateway`] is the seam the agent loop talks through: full message
//! history plus the tool catalog in, one assistant message out. The
//! returned message carries either final text (no tool calls) or one or
//! more tool calls the loop must satisfy before invoking the gateway
//! again. Implementations surface transport failures and timeouts as
//! [`FlydeskError::ModelUnavailable`](crate::error::FlydeskError) and do
//! not retry internally; retry policy belongs to the caller.
//!
//! Tests substitute hand-rolled stub gateways; see the agent loop tests.

pub mod gemini;

pub use gemini::GeminiGateway;

use async_trait::async_trait;

use crate::conversation::Message;
use crate::error::Result;
use crate::tools::ToolDefinition;

/// Boundary abstraction over one language-model invocation.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Ask the model for the next message given the full history.
    ///
    /// The tool catalog is bound into every invocation so the model knows
    /// what it may request; the returned message always has role
    /// Assistant.
    async fn invoke(&self, history: &[Message], tools: &[ToolDefinition]) -> Result<Message>;
}
