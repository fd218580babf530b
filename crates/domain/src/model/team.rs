use serde::{Deserialize, Serialize};

use super::{TeamId, UserId};

/// A team that owns rosters, schedules, and events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub active: bool,
    pub scheduling_timezone: String,
    pub override_phone: Option<String>,
    pub iris_escalation_plan: Option<String>,
    pub description: String,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, scheduling_timezone: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            scheduling_timezone: scheduling_timezone.into(),
            override_phone: None,
            iris_escalation_plan: None,
            description: String::new(),
        }
    }
}

/// Retained record of a soft-deleted team.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeletedTeam {
    pub team_id: TeamId,
    pub old_name: String,
    pub new_name: String,
    pub deletion_date: i64,
}

/// `team_admin` relation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TeamAdmin {
    pub team_id: TeamId,
    pub user_id: UserId,
}

/// `team_user` relation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TeamUser {
    pub team_id: TeamId,
    pub user_id: UserId,
}

/// `pinned_team` relation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PinnedTeam {
    pub user_id: UserId,
    pub team_id: TeamId,
}
