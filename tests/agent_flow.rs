//! End-to-end orchestration scenarios with a scripted model gateway and
//! the real tools over temporary data files.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use flydesk::agent::{AgentConfig, AgentLoop};
use flydesk::conversation::{Conversation, Message, ToolCall};
use flydesk::error::Result;
use flydesk::providers::ModelGateway;
use flydesk::tools::{
    KnowledgeBaseTool, LeadManagementTool, LeadStore, ScheduleMeetingTool, ToolDefinition,
    ToolRegistry,
};

/// Replays scripted assistant messages; once the script runs out it echoes
/// the latest tool result so scenarios can assert data flow.
struct ScriptedGateway {
    script: Mutex<Vec<Message>>,
}

impl ScriptedGateway {
    fn new(script: Vec<Message>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
        })
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn invoke(&self, history: &[Message], _tools: &[ToolDefinition]) -> Result<Message> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            let last_tool_output = history
                .iter()
                .rev()
                .find(|m| m.is_tool_result())
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(Message::assistant(format!("Based on: {}", last_tool_output)))
        } else {
            Ok(script.remove(0))
        }
    }
}

struct Fixture {
    _dir: TempDir,
    lead_store: LeadStore,
    registry: Arc<ToolRegistry>,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("company_info.json"),
        r#"{"name": "Fly Your Tech", "services": ["AI", "Web"]}"#,
    )
    .unwrap();

    let lead_store = LeadStore::new(dir.path().join("leads.json"));

    let mut registry = ToolRegistry::new();
    registry.register(Box::new(KnowledgeBaseTool::new(
        dir.path().join("company_info.json"),
    )));
    registry.register(Box::new(LeadManagementTool::new(lead_store.clone())));
    registry.register(Box::new(ScheduleMeetingTool));

    Fixture {
        _dir: dir,
        lead_store,
        registry: Arc::new(registry),
    }
}

fn agent(gateway: Arc<dyn ModelGateway>, registry: Arc<ToolRegistry>) -> AgentLoop {
    AgentLoop::new(
        gateway,
        registry,
        AgentConfig {
            max_turns: 6,
            model_timeout: Duration::from_secs(2),
            tool_timeout: Duration::from_secs(2),
        },
    )
}

#[tokio::test]
async fn services_question_flows_through_knowledge_base() {
    let fx = fixture();
    let gateway = ScriptedGateway::new(vec![Message::assistant_with_tools(
        "",
        vec![ToolCall::new("call_kb", "knowledge_base", json!({"query": "services"}))],
    )]);

    let reply = agent(gateway, fx.registry)
        .run(
            Conversation::from_messages(vec![Message::user("What are your services?")]),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    // The echoing gateway proves the tool output reached the model.
    assert!(reply.content.contains("Fly Your Tech"));
    assert!(reply.content.contains("AI"));
}

#[tokio::test]
async fn lead_is_created_and_visible_in_store() {
    let fx = fixture();
    let gateway = ScriptedGateway::new(vec![
        Message::assistant_with_tools(
            "",
            vec![ToolCall::new(
                "call_lead",
                "lead_management",
                json!({
                    "action": "create_lead",
                    "leadData": {"name": "Jane", "email": "jane@x.com", "service_interested": "AI"}
                }),
            )],
        ),
        Message::assistant("You're all set, Jane!"),
    ]);

    let reply = agent(gateway, fx.registry.clone())
        .run(
            Conversation::from_messages(vec![Message::user(
                "I'm Jane (jane@x.com), interested in AI.",
            )]),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(reply.content, "You're all set, Jane!");

    let leads = fx.lead_store.read_all().await.unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].status, "New");
    assert_eq!(leads[0].service_interested.as_deref(), Some("AI"));
}

#[tokio::test]
async fn meeting_scheduling_round_trip() {
    let fx = fixture();
    let gateway = ScriptedGateway::new(vec![Message::assistant_with_tools(
        "",
        vec![ToolCall::new(
            "call_meet",
            "schedule_meeting",
            json!({
                "email": "jane@x.com",
                "dateTime": "2026-09-01 10:00",
                "purpose": "AI project kickoff"
            }),
        )],
    )]);

    let reply = agent(gateway, fx.registry)
        .run(
            Conversation::from_messages(vec![Message::user("Book me a call tomorrow at 10.")]),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(reply.content.contains("Meeting successfully scheduled"));
    assert!(reply.content.contains("jane@x.com"));
}

#[tokio::test]
async fn invalid_arguments_are_recoverable_mid_run() {
    let fx = fixture();
    // First call forgets leadData; the model "reads" the error and retries
    // correctly, then closes.
    let gateway = ScriptedGateway::new(vec![
        Message::assistant_with_tools(
            "",
            vec![ToolCall::new("call_1", "lead_management", json!({"action": "create_lead"}))],
        ),
        Message::assistant_with_tools(
            "",
            vec![ToolCall::new(
                "call_2",
                "lead_management",
                json!({
                    "action": "create_lead",
                    "leadData": {"name": "Sam", "email": "sam@x.com"}
                }),
            )],
        ),
        Message::assistant("Saved you as a lead, Sam."),
    ]);

    let reply = agent(gateway, fx.registry.clone())
        .run(
            Conversation::from_messages(vec![Message::user("Sign me up")]),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(reply.content, "Saved you as a lead, Sam.");
    assert_eq!(fx.lead_store.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn parallel_tool_calls_in_one_turn_all_answered() {
    let fx = fixture();
    let gateway = ScriptedGateway::new(vec![
        Message::assistant_with_tools(
            "",
            vec![
                ToolCall::new("call_a", "knowledge_base", json!({"query": "pricing"})),
                ToolCall::new("call_b", "lead_management", json!({"action": "read_all"})),
            ],
        ),
        Message::assistant("Here's everything you asked for."),
    ]);

    let reply = agent(gateway, fx.registry)
        .run(
            Conversation::from_messages(vec![Message::user("Pricing, and current leads?")]),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(reply.content, "Here's everything you asked for.");
}
