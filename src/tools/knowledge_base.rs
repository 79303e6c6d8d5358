//! Knowledge base tool
//!
//! Serves the company information record (address, contact details,
//! services, pricing) from a JSON file. The record is returned whole and
//! verbatim; the `query` argument is accepted for the model's benefit but
//! deliberately unused — with a record this small, letting the model pick
//! out the relevant part beats maintaining a filter.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::error::{FlydeskError, Result};

use super::Tool;

/// Tool that fetches company information.
///
/// # Parameters
/// - `query`: The company-related question (required, currently unused)
pub struct KnowledgeBaseTool {
    data_path: PathBuf,
}

impl KnowledgeBaseTool {
    /// Create a knowledge base tool backed by the JSON file at `data_path`.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }
}

#[async_trait]
impl Tool for KnowledgeBaseTool {
    fn name(&self) -> &str {
        "knowledge_base"
    }

    fn description(&self) -> &str {
        "Fetch information about 'Fly Your Tech' company, including address, \
         contact details, services, and pricing."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The company-related query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, _args: Value) -> Result<String> {
        let raw = tokio::fs::read_to_string(&self.data_path)
            .await
            .map_err(|e| FlydeskError::Execution {
                tool: self.name().to_string(),
                reason: format!("failed to read company info: {}", e),
            })?;

        // Re-serialize rather than returning the raw file so malformed
        // data surfaces here instead of confusing the model.
        let data: Value = serde_json::from_str(&raw).map_err(|e| FlydeskError::Execution {
            tool: self.name().to_string(),
            reason: format!("company info is not valid JSON: {}", e),
        })?;

        Ok(data.to_string())
    }
}
