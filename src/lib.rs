//! Flydesk - a lightweight sales and support assistant
//!
//! Flydesk answers company questions, manages sales leads, and schedules
//! meetings by delegating to a language model that may invoke tools
//! mid-conversation. The heart of the crate is the [`agent`] module's
//! orchestration loop; [`tools`] declares what the model may call,
//! [`providers`] wraps the model endpoint, [`conversation`] holds the
//! message log, and [`server`] exposes the chat API over HTTP.

pub mod agent;
pub mod config;
pub mod conversation;
pub mod error;
pub mod providers;
pub mod server;
pub mod tools;

pub use error::{FlydeskError, Result};
