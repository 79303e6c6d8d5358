//! Meeting scheduling tool
//!
//! Simulated: no calendar integration exists, the invite is logged and a
//! confirmation string returned. The arguments are still validated so the
//! model learns the correct shape.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{FlydeskError, Result};

use super::Tool;

/// Tool that "schedules" a meeting with a potential client.
///
/// # Parameters
/// - `email`: client email address (required)
/// - `dateTime`: preferred date and time (required)
/// - `purpose`: reason for the meeting (required)
///
/// # Example
/// ```rust
/// use flydesk::tools::{ScheduleMeetingTool, Tool};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let tool = ScheduleMeetingTool;
/// let result = tool
///     .execute(json!({
///         "email": "client@x.com",
///         "dateTime": "Monday 10:00",
///         "purpose": "project demo"
///     }))
///     .await;
/// assert!(result.unwrap().contains("client@x.com"));
/// # });
/// ```
pub struct ScheduleMeetingTool;

impl ScheduleMeetingTool {
    fn required_str<'a>(&self, args: &'a Value, key: &str) -> Result<&'a str> {
        args.get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FlydeskError::InvalidArguments {
                tool: self.name().to_string(),
                reason: format!("missing required field '{}'", key),
            })
    }
}

#[async_trait]
impl Tool for ScheduleMeetingTool {
    fn name(&self) -> &str {
        "schedule_meeting"
    }

    fn description(&self) -> &str {
        "Schedule a meeting or send a calendar invite to a potential client."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "Client email address"
                },
                "dateTime": {
                    "type": "string",
                    "description": "Preferred date and time for the meeting"
                },
                "purpose": {
                    "type": "string",
                    "description": "Reason for the meeting"
                }
            },
            "required": ["email", "dateTime", "purpose"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let email = self.required_str(&args, "email")?;
        let date_time = self.required_str(&args, "dateTime")?;
        let purpose = self.required_str(&args, "purpose")?;

        info!(email, date_time, purpose, "scheduling meeting (simulated)");

        Ok(format!(
            "Meeting successfully scheduled for {} on {}. A calendar invite will be sent shortly.",
            email, date_time
        ))
    }
}
