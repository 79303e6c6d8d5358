//! Configuration - environment-driven settings
//!
//! All settings come from environment variables (optionally via a `.env`
//! file loaded at startup). The only required variable is
//! `GOOGLE_API_KEY`; everything else has a default tuned for local
//! development.
//!
//! | Variable                 | Default                  |
//! |--------------------------|--------------------------|
//! | `GOOGLE_API_KEY`         | (required)               |
//! | `GEMINI_MODEL`           | `gemini-2.5-flash-lite`  |
//! | `FLYDESK_TEMPERATURE`    | `0.7`                    |
//! | `HOST`                   | `0.0.0.0`                |
//! | `PORT`                   | `5000`                   |
//! | `FLYDESK_DATA_DIR`       | `data`                   |
//! | `FLYDESK_MAX_TURNS`      | `10`                     |
//! | `FLYDESK_MODEL_TIMEOUT`  | `60` (seconds)           |
//! | `FLYDESK_TOOL_TIMEOUT`   | `30` (seconds)           |
//! | `FLYDESK_SYSTEM_PROMPT`  | built-in persona prompt  |

use std::path::PathBuf;
use std::time::Duration;

use crate::agent::AgentConfig;
use crate::error::{FlydeskError, Result};

/// Persona instruction injected at the head of every orchestration run.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the assistant for 'Fly Your Tech', a \
technology services company. Answer questions about the company using the knowledge_base \
tool, record interested customers as leads with the lead_management tool, and offer to \
schedule a meeting with the schedule_meeting tool when a customer wants to talk. Be \
concise and friendly, and never invent company facts.";

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub max_turns: u32,
    pub model_timeout: Duration,
    pub tool_timeout: Duration,
    pub system_prompt: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if `.env` support is wanted; this
    /// function only reads what is already in the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = get("GOOGLE_API_KEY")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| FlydeskError::Config("GOOGLE_API_KEY is not set".to_string()))?;

        Ok(Self {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash-lite".to_string()),
            temperature: parse_or(&get, "FLYDESK_TEMPERATURE", 0.7)?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 5000)?,
            data_dir: PathBuf::from(get("FLYDESK_DATA_DIR").unwrap_or_else(|| "data".to_string())),
            max_turns: parse_or(&get, "FLYDESK_MAX_TURNS", 10)?,
            model_timeout: Duration::from_secs(parse_or(&get, "FLYDESK_MODEL_TIMEOUT", 60)?),
            tool_timeout: Duration::from_secs(parse_or(&get, "FLYDESK_TOOL_TIMEOUT", 30)?),
            system_prompt: get("FLYDESK_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        })
    }

    pub fn company_info_path(&self) -> PathBuf {
        self.data_dir.join("company_info.json")
    }

    pub fn leads_path(&self) -> PathBuf {
        self.data_dir.join("leads.json")
    }

    /// The loop limits derived from this configuration.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            max_turns: self.max_turns,
            model_timeout: self.model_timeout,
            tool_timeout: self.tool_timeout,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| FlydeskError::Config(format!("invalid value for {}: '{}'", key, raw))),
    }
}
