use serde::{Deserialize, Serialize};

use super::{RoleId, RosterId, ScheduleId, TeamId, UserId};
use crate::time::SECONDS_PER_WEEK;

/// Which scheduler implementation materializes a schedule's shifts
/// and round-robin variants").
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerKind {
    Default,
    RoundRobin,
}

impl SchedulerKind {
    pub fn name(self) -> &'static str {
        match self {
            SchedulerKind::Default => "default",
            SchedulerKind::RoundRobin => "round-robin",
        }
    }
}

/// One `(start_offset, duration)` entry within a schedule template
///. `start_offset_seconds` is interpreted weekly,
/// within `[0, 1 week)`, in the owning team's scheduling timezone.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleEvent {
    pub start_offset_seconds: i64,
    pub duration_seconds: i64,
}

impl ScheduleEvent {
    pub fn end_offset_seconds(&self) -> i64 {
        self.start_offset_seconds + self.duration_seconds
    }
}

/// Sort by start offset and coalesce touching-boundary entries
/// (`a.end == b.start`) into one. Called whenever a schedule's events
/// are written.
pub fn normalize_schedule_events(mut events: Vec<ScheduleEvent>) -> Vec<ScheduleEvent> {
    events.sort_by_key(|e| e.start_offset_seconds);
    let mut merged: Vec<ScheduleEvent> = Vec::with_capacity(events.len());
    for e in events {
        if let Some(last) = merged.last_mut() {
            if last.end_offset_seconds() == e.start_offset_seconds {
                last.duration_seconds += e.duration_seconds;
                continue;
            }
        }
        merged.push(e);
    }
    merged
}

/// A scheduling template owned by a (team, roster).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub team_id: TeamId,
    pub roster_id: RosterId,
    pub role_id: RoleId,
    /// Horizon in days the auto-scheduler materializes ahead of now.
    pub auto_populate_threshold: i64,
    pub advanced_mode: bool,
    pub scheduler: SchedulerKind,
    pub last_epoch_scheduled: Option<i64>,
    pub last_scheduled_user_id: Option<UserId>,
    pub events: Vec<ScheduleEvent>,
    /// Cyclic user order for the round-robin scheduler, `None` unless set.
    pub schedule_order: Option<Vec<UserId>>,
}

impl Schedule {
    /// One full cycle of this template, i.e. one week.
    pub fn cycle_seconds(&self) -> i64 {
        SECONDS_PER_WEEK
    }

    /// "Simple mode": either one event of duration in
    /// {1 week, 2 weeks}, or 7/14 events of 12h each. Non-simple shapes
    /// require `advanced_mode = true`.
    pub fn is_simple_mode(&self) -> bool {
        let events = normalize_schedule_events(self.events.clone());
        if events.len() == 1 {
            let d = events[0].duration_seconds;
            return d == SECONDS_PER_WEEK || d == 2 * SECONDS_PER_WEEK;
        }
        if events.len() == 7 || events.len() == 14 {
            return events.iter().all(|e| e.duration_seconds == 12 * 3600);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn se(start: i64, dur: i64) -> ScheduleEvent {
        ScheduleEvent {
            start_offset_seconds: start,
            duration_seconds: dur,
        }
    }

    #[test]
    fn merges_touching_boundaries() {
        let events = vec![se(0, 3600), se(3600, 3600), se(10_000, 100)];
        let merged = normalize_schedule_events(events);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].duration_seconds, 7200);
    }

    #[test]
    fn leaves_gapped_events_unmerged() {
        let events = vec![se(0, 3600), se(7200, 3600)];
        let merged = normalize_schedule_events(events);
        assert_eq!(merged.len(), 2);
    }

    fn sched(events: Vec<ScheduleEvent>) -> Schedule {
        Schedule {
            id: 1,
            team_id: 1,
            roster_id: 1,
            role_id: 1,
            auto_populate_threshold: 21,
            advanced_mode: false,
            scheduler: SchedulerKind::Default,
            last_epoch_scheduled: None,
            last_scheduled_user_id: None,
            events,
            schedule_order: None,
        }
    }

    #[test]
    fn one_week_event_is_simple() {
        assert!(sched(vec![se(0, SECONDS_PER_WEEK)]).is_simple_mode());
    }

    #[test]
    fn seven_twelve_hour_events_is_simple() {
        let events = (0..7).map(|i| se(i * 86_400, 12 * 3600)).collect();
        assert!(sched(events).is_simple_mode());
    }

    #[test]
    fn arbitrary_shape_is_not_simple() {
        assert!(!sched(vec![se(0, 1000)]).is_simple_mode());
    }
}
