use serde::{Deserialize, Serialize};

use super::{RosterId, TeamId, UserId};

/// A named pool of users eligible for a team's schedules.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Roster {
    pub id: RosterId,
    pub team_id: TeamId,
    pub name: String,
}

/// `roster_user` relation: membership plus rotation state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RosterUser {
    pub roster_id: RosterId,
    pub user_id: UserId,
    pub in_rotation: bool,
    /// Dense per-roster priority, ascending = higher priority for
    /// fairness tie-breaks.
    pub roster_priority: i32,
}
