use oncall_domain::model::*;
use oncall_domain::{Error, Result};

use crate::tables::Tables;

impl Tables {
    pub fn insert_schedule(
        &mut self,
        team_id: TeamId,
        roster_id: RosterId,
        role_id: RoleId,
        scheduler: SchedulerKind,
        auto_populate_threshold: i64,
        advanced_mode: bool,
        events: Vec<ScheduleEvent>,
    ) -> Result<ScheduleId> {
        if !self.rosters.contains_key(&roster_id) {
            return Err(Error::conflict("roster not found"));
        }
        self.next_schedule_id += 1;
        let id = self.next_schedule_id;
        self.schedules.insert(
            id,
            Schedule {
                id,
                team_id,
                roster_id,
                role_id,
                auto_populate_threshold,
                advanced_mode,
                scheduler,
                last_epoch_scheduled: None,
                last_scheduled_user_id: None,
                events: normalize_schedule_events(events),
                schedule_order: None,
            },
        );
        Ok(id)
    }

    pub fn delete_schedule(&mut self, schedule_id: ScheduleId) -> Result<()> {
        if self.schedules.remove(&schedule_id).is_none() {
            return Err(Error::not_found("schedule not found"));
        }
        self.events.retain(|_, e| e.schedule_id != Some(schedule_id));
        Ok(())
    }

    pub fn set_schedule_order(&mut self, schedule_id: ScheduleId, order: Vec<UserId>) -> Result<()> {
        let schedule = self
            .schedules
            .get_mut(&schedule_id)
            .ok_or_else(|| Error::not_found("schedule not found"))?;
        schedule.schedule_order = Some(order);
        Ok(())
    }

    pub fn schedules_for_team(&self, team_id: TeamId) -> Vec<ScheduleId> {
        let mut ids: Vec<ScheduleId> = self
            .schedules
            .values()
            .filter(|s| s.team_id == team_id)
            .map(|s| s.id)
            .collect();
        ids.sort();
        ids
    }
}
