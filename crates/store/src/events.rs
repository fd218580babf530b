use oncall_domain::model::*;
use oncall_domain::Result;

use crate::tables::Tables;

impl Tables {
    #[allow(clippy::too_many_arguments)]
    pub fn insert_event(
        &mut self,
        start: i64,
        end: i64,
        user_id: UserId,
        team_id: TeamId,
        role_id: RoleId,
        schedule_id: Option<ScheduleId>,
        link_id: Option<LinkId>,
        note: Option<String>,
    ) -> Result<EventId> {
        self.next_event_id += 1;
        let id = self.next_event_id;
        self.events.insert(
            id,
            Event {
                id,
                start,
                end,
                user_id,
                team_id,
                role_id,
                schedule_id,
                link_id,
                note,
            },
        );
        Ok(id)
    }

    /// Invariant O: no two events for the same (team, role) may overlap in
    /// time, except when comparing an event against itself during an edit.
    pub fn overlapping_events(
        &self,
        team_id: TeamId,
        role_id: RoleId,
        start: i64,
        end: i64,
        excluding: Option<EventId>,
    ) -> Vec<EventId> {
        self.events
            .values()
            .filter(|e| {
                e.team_id == team_id
                    && e.role_id == role_id
                    && Some(e.id) != excluding
                    && e.overlaps(start, end)
            })
            .map(|e| e.id)
            .collect()
    }

    pub fn events_for_link(&self, link_id: &str) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self
            .events
            .values()
            .filter(|e| e.link_id.as_deref() == Some(link_id))
            .map(|e| e.id)
            .collect();
        ids.sort();
        ids
    }

    /// Events for a (team, role) whose window touches `[start, end)`,
    /// ordered by start — the candidate pool for swap/override
    /// consecutiveness checks and for the schedule query API.
    pub fn events_in_range(
        &self,
        team_id: TeamId,
        role_id: Option<RoleId>,
        start: i64,
        end: i64,
    ) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self
            .events
            .values()
            .filter(|e| {
                e.team_id == team_id
                    && role_id.map_or(true, |r| e.role_id == r)
                    && e.start < end
                    && e.end > start
            })
            .map(|e| e.id)
            .collect();
        ids.sort_by_key(|id| self.events[id].start);
        ids
    }

    pub fn events_for_user(&self, user_id: UserId, start: i64, end: i64) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self
            .events
            .values()
            .filter(|e| e.user_id == user_id && e.start < end && e.end > start)
            .map(|e| e.id)
            .collect();
        ids.sort_by_key(|id| self.events[id].start);
        ids
    }
}
