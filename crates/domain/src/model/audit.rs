use serde::{Deserialize, Serialize};

/// One append-only audit log row, written by the sink alongside every
/// successful mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub team_name: String,
    pub owner_name: String,
    pub action_name: String,
    pub timestamp: i64,
    pub context: serde_json::Value,
}
