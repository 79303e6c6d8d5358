//! Gemini model gateway
//!
//! Talks to the Google Generative Language REST API
//! (`models/{model}:generateContent`). History encoding:
//!
//! - system messages are folded into `systemInstruction`
//! - user text becomes a `user` content with a `text` part
//! - assistant turns become `model` contents with `text` and/or
//!   `functionCall` parts
//! - tool results become `user` contents with `functionResponse` parts
//!
//! The wire format correlates function responses by tool *name*, not id,
//! so this gateway synthesizes a `call_<uuid>` id for every function call
//! it decodes and drops ids again when encoding. The loop's id pairing is
//! an internal contract only.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::conversation::{Message, Role, ToolCall};
use crate::error::{FlydeskError, Result};
use crate::tools::ToolDefinition;

use super::ModelGateway;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gateway for Gemini models.
pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl GeminiGateway {
    /// Create a gateway with the given API key and model name.
    ///
    /// `timeout` bounds one full model invocation; hitting it surfaces as
    /// `ModelUnavailable`.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlydeskError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        })
    }

    /// Override the API base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    generation_config: Value,
}

#[derive(Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Value>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Encode history and the tool catalog into a Gemini request body.
fn build_request(
    history: &[Message],
    tools: &[ToolDefinition],
    temperature: f64,
) -> GenerateContentRequest {
    let mut system_texts: Vec<&str> = Vec::new();
    let mut contents: Vec<Content> = Vec::new();

    for message in history {
        match message.role {
            Role::System => system_texts.push(&message.content),
            Role::User => contents.push(Content {
                role: "user".to_string(),
                parts: vec![json!({"text": message.content})],
            }),
            Role::Assistant => {
                let mut parts = Vec::new();
                if !message.content.is_empty() {
                    parts.push(json!({"text": message.content}));
                }
                for call in &message.tool_calls {
                    parts.push(json!({
                        "functionCall": {"name": call.name, "args": call.arguments}
                    }));
                }
                contents.push(Content {
                    role: "model".to_string(),
                    parts,
                });
            }
            Role::Tool => {
                let name = message.tool_name.as_deref().unwrap_or("unknown");
                // Function responses must be objects; wrap plain strings,
                // pass structured tool output through as-is.
                let response = serde_json::from_str::<Value>(&message.content)
                    .ok()
                    .filter(Value::is_object)
                    .unwrap_or_else(|| json!({"content": message.content}));
                contents.push(Content {
                    role: "user".to_string(),
                    parts: vec![json!({
                        "functionResponse": {"name": name, "response": response}
                    })],
                });
            }
        }
    }

    let declarations: Vec<Value> = tools
        .iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "parameters": t.parameters,
            })
        })
        .collect();

    GenerateContentRequest {
        system_instruction: (!system_texts.is_empty()).then(|| Content {
            role: "system".to_string(),
            parts: vec![json!({"text": system_texts.join("\n\n")})],
        }),
        contents,
        tools: if declarations.is_empty() {
            Vec::new()
        } else {
            vec![json!({"functionDeclarations": declarations})]
        },
        generation_config: json!({"temperature": temperature}),
    }
}

/// Decode a Gemini response into an assistant message.
fn parse_response(body: GenerateContentResponse) -> Result<Message> {
    let content = body
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or_else(|| FlydeskError::ModelUnavailable("model returned no candidates".into()))?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for part in content.parts {
        if let Some(t) = part.get("text").and_then(|v| v.as_str()) {
            text.push_str(t);
        }
        if let Some(call) = part.get("functionCall") {
            let name = call
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
            tool_calls.push(ToolCall::new(
                format!("call_{}", Uuid::new_v4().simple()),
                name,
                args,
            ));
        }
    }

    Ok(Message::assistant_with_tools(text, tool_calls))
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn invoke(&self, history: &[Message], tools: &[ToolDefinition]) -> Result<Message> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = build_request(history, tools, self.temperature);

        debug!(model = %self.model, messages = history.len(), "invoking Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FlydeskError::ModelUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FlydeskError::ModelUnavailable(format!(
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FlydeskError::ModelUnavailable(format!("bad response body: {}", e)))?;

        parse_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tools() -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: "knowledge_base".to_string(),
            description: "Company info".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }),
        }]
    }

    #[test]
    fn test_build_request_encodes_roles() {
        let history = vec![
            Message::system("You are a sales assistant."),
            Message::user("What are your services?"),
            Message::assistant_with_tools(
                "",
                vec![ToolCall::new("call_1", "knowledge_base", json!({"query": "services"}))],
            ),
            Message::tool_result("call_1", "knowledge_base", r#"{"services": ["AI"]}"#),
        ];

        let request = build_request(&history, &sample_tools(), 0.7);
        let encoded = serde_json::to_value(&request).unwrap();

        assert_eq!(
            encoded["systemInstruction"]["parts"][0]["text"],
            "You are a sales assistant."
        );
        assert_eq!(encoded["contents"][0]["role"], "user");
        assert_eq!(encoded["contents"][1]["role"], "model");
        assert_eq!(
            encoded["contents"][1]["parts"][0]["functionCall"]["name"],
            "knowledge_base"
        );
        // Tool result: correlated by name, structured output passed through.
        assert_eq!(
            encoded["contents"][2]["parts"][0]["functionResponse"]["name"],
            "knowledge_base"
        );
        assert_eq!(
            encoded["contents"][2]["parts"][0]["functionResponse"]["response"]["services"][0],
            "AI"
        );
        assert_eq!(
            encoded["tools"][0]["functionDeclarations"][0]["name"],
            "knowledge_base"
        );
        assert_eq!(encoded["generationConfig"]["temperature"], 0.7);
    }

    #[test]
    fn test_build_request_wraps_plain_string_tool_output() {
        let history = vec![Message::tool_result(
            "call_1",
            "schedule_meeting",
            "Meeting scheduled.",
        )];
        let request = build_request(&history, &[], 0.7);
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded["contents"][0]["parts"][0]["functionResponse"]["response"]["content"],
            "Meeting scheduled."
        );
    }

    #[test]
    fn test_parse_response_text_only() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "We offer AI and Web."}]}
            }]
        }))
        .unwrap();

        let message = parse_response(body).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "We offer AI and Web.");
        assert!(!message.has_tool_calls());
    }

    #[test]
    fn test_parse_response_function_call_gets_synthetic_id() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "knowledge_base", "args": {"query": "pricing"}}},
                    {"functionCall": {"name": "lead_management", "args": {"action": "read_all"}}}
                ]}
            }]
        }))
        .unwrap();

        let message = parse_response(body).unwrap();
        assert_eq!(message.tool_calls.len(), 2);
        assert!(message.tool_calls[0].id.starts_with("call_"));
        assert_ne!(message.tool_calls[0].id, message.tool_calls[1].id);
        assert_eq!(message.tool_calls[0].arguments["query"], "pricing");
    }

    #[test]
    fn test_parse_response_no_candidates() {
        let body: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(matches!(
            parse_response(body),
            Err(FlydeskError::ModelUnavailable(_))
        ));
    }
}
