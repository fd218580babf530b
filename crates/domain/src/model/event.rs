use serde::{Deserialize, Serialize};

use super::{EventId, LinkId, RoleId, ScheduleId, TeamId, UserId};

/// A materialized on-call shift.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub start: i64,
    pub end: i64,
    pub user_id: UserId,
    pub team_id: TeamId,
    pub role_id: RoleId,
    pub schedule_id: Option<ScheduleId>,
    pub link_id: Option<LinkId>,
    pub note: Option<String>,
}

impl Event {
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        self.start < end && start < self.end
    }
}
