//! Error types for Flydesk
//!
//! A single crate-wide error enum plus a `Result` alias. Tool-level
//! failures (`UnknownTool`, `InvalidArguments`, `Execution`) are
//! normally converted to in-band tool-result content by the executor so
//! the model can recover conversationally; only `ModelUnavailable` and
//! `ExceededMaxTurns` abort an orchestration run.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FlydeskError>;

/// All errors produced by Flydesk components.
#[derive(Debug, Error)]
pub enum FlydeskError {
    /// The model requested a tool that is not in the registry.
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// A tool call's arguments failed schema validation.
    #[error("invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// A tool ran but failed (storage error, timeout, ...).
    #[error("tool '{tool}' failed: {reason}")]
    Execution { tool: String, reason: String },

    /// The model endpoint could not be reached or timed out.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The loop hit its turn bound while the model kept requesting tools.
    #[error("orchestration exceeded {0} turns without a final reply")]
    ExceededMaxTurns(u32),

    /// The caller aborted the request before a final reply was produced.
    #[error("request cancelled")]
    Cancelled,

    /// Configuration problem at startup.
    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlydeskError {
    /// Machine-readable code for the caller-facing boundary.
    ///
    /// The HTTP layer returns this alongside a generic apology; internal
    /// detail stays in operator logs.
    pub fn code(&self) -> &'static str {
        match self {
            FlydeskError::UnknownTool(_) => "unknown_tool",
            FlydeskError::InvalidArguments { .. } => "invalid_tool_arguments",
            FlydeskError::Execution { .. } => "tool_execution_failure",
            FlydeskError::ModelUnavailable(_) => "model_unavailable",
            FlydeskError::ExceededMaxTurns(_) => "exceeded_max_turns",
            FlydeskError::Cancelled => "cancelled",
            FlydeskError::Config(_) => "config_error",
            FlydeskError::Io(_) => "io_error",
            FlydeskError::Json(_) => "json_error",
        }
    }
}
