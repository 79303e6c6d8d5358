//! Agent module - the tool-calling orchestration core
//!
//! This module owns the control logic that turns one user message into a
//! final assistant reply. The loop alternates between asking the model
//! gateway for the next message and, when the model requests tools,
//! executing the whole batch and feeding the results back, until the
//! model answers in plain text.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ HTTP server │────>│  AgentLoop  │────>│ ModelGateway │
//! │ (/api/chat) │     │             │     │   (Gemini)   │
//! └─────────────┘     └─────────────┘     └──────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐     ┌──────────────┐
//!                     │ToolExecutor │────>│ ToolRegistry │
//!                     │             │     │  (3 tools)   │
//!                     └─────────────┘     └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flydesk::agent::{AgentConfig, AgentLoop};
//! use flydesk::conversation::{Conversation, Message};
//! use flydesk::providers::GeminiGateway;
//! use flydesk::tools::{KnowledgeBaseTool, ToolRegistry};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn answer(gateway: Arc<GeminiGateway>) {
//!     let mut registry = ToolRegistry::new();
//!     registry.register(Box::new(KnowledgeBaseTool::new("data/company_info.json")));
//!
//!     let agent = AgentLoop::new(gateway, Arc::new(registry), AgentConfig::default());
//!     let conversation =
//!         Conversation::from_messages(vec![Message::user("What are your services?")]);
//!     let reply = agent.run(conversation, CancellationToken::new()).await.unwrap();
//!     println!("{}", reply.content);
//! }
//! ```

mod executor;
mod r#loop;

pub use executor::ToolExecutor;
pub use r#loop::{AgentConfig, AgentLoop};
