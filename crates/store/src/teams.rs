use oncall_domain::model::*;
use oncall_domain::{time, Error, Result};

use crate::tables::Tables;

impl Tables {
    pub fn insert_team(&mut self, name: &str, scheduling_timezone: &str) -> Result<TeamId> {
        if self.teams.values().any(|t| t.active && t.name == name) {
            return Err(Error::conflict(format!("team '{name}' already exists")));
        }
        self.next_team_id += 1;
        let id = self.next_team_id;
        self.teams
            .insert(id, Team::new(id, name, scheduling_timezone));
        Ok(id)
    }

    /// Soft-delete: rename to a random token, drop all future events,
    /// retain a `DeletedTeam` record.
    pub fn soft_delete_team(&mut self, team_id: TeamId) -> Result<()> {
        let team = self
            .teams
            .get_mut(&team_id)
            .ok_or_else(|| Error::not_found("team not found"))?;
        let old_name = team.name.clone();
        let new_name = format!("deleted-{}-{}", team_id, oncall_domain::model::new_link_id()[..12].to_string());
        team.name = new_name.clone();
        team.active = false;

        let now = time::now();
        self.events
            .retain(|_, e| !(e.team_id == team_id && e.start >= now));

        self.deleted_teams.push(DeletedTeam {
            team_id,
            old_name,
            new_name,
            deletion_date: now,
        });
        Ok(())
    }

    pub fn add_team_admin(&mut self, team_id: TeamId, user_id: UserId) {
        self.team_admins.insert(TeamAdmin { team_id, user_id });
        self.team_users.insert(TeamUser { team_id, user_id });
    }

    pub fn add_team_user(&mut self, team_id: TeamId, user_id: UserId) {
        self.team_users.insert(TeamUser { team_id, user_id });
    }
}
