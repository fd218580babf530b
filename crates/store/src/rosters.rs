use oncall_domain::model::*;
use oncall_domain::{Error, Result};

use crate::tables::Tables;

impl Tables {
    pub fn insert_roster(&mut self, team_id: TeamId, name: &str) -> Result<RosterId> {
        if self
            .rosters
            .values()
            .any(|r| r.team_id == team_id && r.name == name)
        {
            return Err(Error::conflict(format!(
                "roster '{name}' already exists for this team"
            )));
        }
        self.next_roster_id += 1;
        let id = self.next_roster_id;
        self.rosters.insert(
            id,
            Roster {
                id,
                team_id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    /// Deleting a roster cascades to its users and schedules.
    pub fn delete_roster(&mut self, roster_id: RosterId) -> Result<()> {
        if self.rosters.remove(&roster_id).is_none() {
            return Err(Error::not_found("roster not found"));
        }
        self.roster_users.retain(|ru| ru.roster_id != roster_id);
        self.schedules.retain(|_, s| s.roster_id != roster_id);
        Ok(())
    }

    pub fn set_roster_user(
        &mut self,
        roster_id: RosterId,
        user_id: UserId,
        in_rotation: bool,
        roster_priority: i32,
    ) {
        if let Some(existing) = self
            .roster_users
            .iter_mut()
            .find(|ru| ru.roster_id == roster_id && ru.user_id == user_id)
        {
            existing.in_rotation = in_rotation;
            existing.roster_priority = roster_priority;
        } else {
            self.roster_users.push(RosterUser {
                roster_id,
                user_id,
                in_rotation,
                roster_priority,
            });
        }
    }

    /// In-rotation roster members who are still team members, sorted by
    /// `roster_priority` ascending.
    pub fn in_rotation_members(&self, roster_id: RosterId, team_id: TeamId) -> Vec<(UserId, i32)> {
        let mut members: Vec<(UserId, i32)> = self
            .roster_users
            .iter()
            .filter(|ru| {
                ru.roster_id == roster_id && ru.in_rotation && self.is_team_member(team_id, ru.user_id)
            })
            .map(|ru| (ru.user_id, ru.roster_priority))
            .collect();
        members.sort_by_key(|(uid, prio)| (*prio, *uid));
        members
    }
}
