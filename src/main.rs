//! Flydesk binary - wires config, tools, gateway, and the HTTP server.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flydesk::agent::AgentLoop;
use flydesk::config::Config;
use flydesk::providers::GeminiGateway;
use flydesk::server::{self, AppState};
use flydesk::tools::{KnowledgeBaseTool, LeadManagementTool, LeadStore, ScheduleMeetingTool, ToolRegistry};

/// Sales and support assistant for Fly Your Tech.
#[derive(Parser)]
#[command(name = "flydesk", version, about)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Data directory holding company_info.json and leads.json
    /// (overrides FLYDESK_DATA_DIR)
    #[arg(long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG from the file is honored too.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir.into();
    }

    let lead_store = LeadStore::new(config.leads_path());

    let mut registry = ToolRegistry::new();
    registry.register(Box::new(KnowledgeBaseTool::new(config.company_info_path())));
    registry.register(Box::new(LeadManagementTool::new(lead_store.clone())));
    registry.register(Box::new(ScheduleMeetingTool));
    info!(tools = registry.len(), model = %config.model, "registry ready");

    let gateway = GeminiGateway::new(
        config.api_key.clone(),
        config.model.clone(),
        config.temperature,
        config.model_timeout,
    )
    .context("building model gateway")?;

    let agent = AgentLoop::new(Arc::new(gateway), Arc::new(registry), config.agent_config());

    let state = AppState {
        agent: Arc::new(agent),
        lead_store,
        system_prompt: config.system_prompt.clone(),
    };

    server::run(&config, state).await.context("running server")?;
    Ok(())
}
