//! Lead management tool
//!
//! CRUD-lite over the sales lead store: list all leads, look one up by id
//! or email, or create a new one. The store is a JSON file guarded by an
//! async mutex so concurrent `create_lead` calls from separate chat
//! requests cannot lose writes.
//!
//! "Lead not found." is returned as ordinary tool output, not an error —
//! the model should tell the user, not trip the error path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{FlydeskError, Result};

use super::Tool;

/// A sales-prospect record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_interested: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the model when creating a lead.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub service_interested: Option<String>,
}

/// File-backed lead collection with serialized writes.
///
/// Reads go through the same mutex as writes; the store is small and the
/// simplicity is worth more than read concurrency. Cloning shares the
/// underlying lock, so one store can back both the tool and the HTTP
/// listing endpoint.
#[derive(Clone)]
pub struct LeadStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl LeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// All leads, in insertion order. A missing file reads as empty.
    pub async fn read_all(&self) -> Result<Vec<Lead>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Find a lead by id or email.
    pub async fn find(&self, id_or_email: &str) -> Result<Option<Lead>> {
        let _guard = self.lock.lock().await;
        let leads = self.load().await?;
        Ok(leads
            .into_iter()
            .find(|l| l.id == id_or_email || l.email == id_or_email))
    }

    /// Append a new lead and persist. Returns the stored record.
    ///
    /// Ids are UUIDv4 rather than timestamps: uniqueness must hold even
    /// when two requests create leads in the same millisecond.
    pub async fn create(&self, data: LeadData) -> Result<Lead> {
        let _guard = self.lock.lock().await;
        let mut leads = self.load().await?;

        let lead = Lead {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            email: data.email,
            service_interested: data.service_interested,
            status: "New".to_string(),
            created_at: Some(Utc::now()),
        };
        leads.push(lead.clone());

        let content = serde_json::to_string_pretty(&leads)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(lead)
    }

    async fn load(&self) -> Result<Vec<Lead>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Tool exposing the lead store to the model.
///
/// # Parameters
/// - `action`: one of `read_all`, `get_lead`, `create_lead` (required)
/// - `leadId`: lead id or email, required for `get_lead`
/// - `leadData`: `{name, email, service_interested?}`, required for `create_lead`
pub struct LeadManagementTool {
    store: LeadStore,
}

impl LeadManagementTool {
    pub fn new(store: LeadStore) -> Self {
        Self { store }
    }

    fn execution_error(&self, reason: String) -> FlydeskError {
        FlydeskError::Execution {
            tool: self.name().to_string(),
            reason,
        }
    }
}

#[async_trait]
impl Tool for LeadManagementTool {
    fn name(&self) -> &str {
        "lead_management"
    }

    fn description(&self) -> &str {
        "Manage sales leads. Actions include: read_all, get_lead (by ID or email), create_lead."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["read_all", "get_lead", "create_lead"],
                    "description": "The action to perform"
                },
                "leadId": {
                    "type": "string",
                    "description": "Lead ID or email for get_lead"
                },
                "leadData": {
                    "type": "object",
                    "description": "Lead data for create_lead",
                    "properties": {
                        "name": {"type": "string"},
                        "email": {"type": "string"},
                        "service_interested": {"type": "string"}
                    },
                    "required": ["name", "email"]
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let action = args
            .get("action")
            .and_then(|v| v.as_str())
            .ok_or_else(|| FlydeskError::InvalidArguments {
                tool: self.name().to_string(),
                reason: "missing required field 'action'".to_string(),
            })?;

        match action {
            "read_all" => {
                let leads = self.store.read_all().await?;
                serde_json::to_string(&leads).map_err(|e| self.execution_error(e.to_string()))
            }
            "get_lead" => {
                let id = args.get("leadId").and_then(|v| v.as_str()).ok_or_else(|| {
                    FlydeskError::InvalidArguments {
                        tool: self.name().to_string(),
                        reason: "get_lead requires 'leadId'".to_string(),
                    }
                })?;
                match self.store.find(id).await? {
                    Some(lead) => {
                        serde_json::to_string(&lead).map_err(|e| self.execution_error(e.to_string()))
                    }
                    None => Ok("Lead not found.".to_string()),
                }
            }
            "create_lead" => {
                let data = args.get("leadData").cloned().ok_or_else(|| {
                    FlydeskError::InvalidArguments {
                        tool: self.name().to_string(),
                        reason: "create_lead requires 'leadData'".to_string(),
                    }
                })?;
                let data: LeadData =
                    serde_json::from_value(data).map_err(|e| FlydeskError::InvalidArguments {
                        tool: self.name().to_string(),
                        reason: format!("bad leadData: {}", e),
                    })?;
                let lead = self.store.create(data).await?;
                Ok(format!("Lead created successfully with ID: {}", lead.id))
            }
            other => Err(FlydeskError::InvalidArguments {
                tool: self.name().to_string(),
                reason: format!("unknown action '{}'", other),
            }),
        }
    }
}
