use serde::{Deserialize, Serialize};

use super::{TeamId, UserId};

/// A resolved request identity: exactly one of these is set
/// into the request context by the Auth component.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Principal {
    User { id: UserId, name: String },
    Application { name: String },
}

impl Principal {
    /// The name recorded as `owner_name` on audit rows.
    pub fn owner_name(&self) -> &str {
        match self {
            Principal::User { name, .. } => name,
            Principal::Application { name } => name,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Principal::User { id, .. } => Some(*id),
            Principal::Application { .. } => None,
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Principal::Application { .. })
    }
}

/// `session(id, csrf_token)`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub csrf_token: String,
    pub user_id: UserId,
}

/// `application(name, key)` — HMAC API client credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    pub api_key: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IcalPrincipalType {
    User,
    Team,
}

/// Grants unauthenticated read of one principal's iCal feed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IcalKeyRecord {
    pub key: String,
    pub requester: UserId,
    pub name: String,
    pub principal_type: IcalPrincipalType,
    pub time_created: i64,
    /// Resolved id of `name` under `principal_type` (user id or team id).
    pub principal_id: TeamId,
}
