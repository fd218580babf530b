//! The "fair-use" scheduler: rank roster candidates by longest idle time, longest
//! time until their next commitment, then `roster_priority`/`user_id` for
//! determinism.

use std::collections::HashSet;

use oncall_domain::model::*;
use oncall_store::Tables;

use crate::horizon::{shifts_for_schedule, Shift};

pub fn schedule_team(tables: &mut Tables, team_id: TeamId, schedule_ids: &[ScheduleId], now: i64) {
    for &schedule_id in schedule_ids {
        let Some(schedule) = tables.schedules.get(&schedule_id).cloned() else {
            continue;
        };
        if matches!(schedule.scheduler, SchedulerKind::Default) {
            schedule_one(tables, team_id, schedule, now);
        }
    }
}

fn schedule_one(tables: &mut Tables, team_id: TeamId, schedule: Schedule, now: i64) {
    let cycle = schedule.cycle_seconds();
    let from = schedule
        .last_epoch_scheduled
        .map(|e| e + cycle)
        .unwrap_or(now);
    let to = now + schedule.auto_populate_threshold * 86_400;
    let shifts = shifts_for_schedule(&schedule.events, from, to, cycle);

    let roster_members = tables.in_rotation_members(schedule.roster_id, team_id);
    if roster_members.is_empty() {
        return;
    }

    let mut last_epoch = schedule.last_epoch_scheduled;
    let mut last_user = schedule.last_scheduled_user_id;

    for shift in shifts {
        if !tables
            .overlapping_events(team_id, schedule.role_id, shift.start, shift.end, None)
            .is_empty()
        {
            // invariant O: a fixed event (manual override, linked group)
            // already occupies this interval; leave it alone.
            continue;
        }

        // Busy checks span every role on the team, not just this
        // schedule's role, so a user can't be double-booked across two
        // roles at the same time.
        let busy: HashSet<UserId> = tables
            .events_in_range(team_id, None, shift.start, shift.end)
            .into_iter()
            .map(|id| tables.events[&id].user_id)
            .collect();

        let candidates: Vec<UserId> = roster_members
            .iter()
            .map(|(uid, _)| *uid)
            .filter(|uid| !busy.contains(uid))
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let chosen = rank_candidates(tables, team_id, schedule.role_id, &roster_members, &candidates, shift);
        let _ = tables.insert_event(
            shift.start,
            shift.end,
            chosen,
            team_id,
            schedule.role_id,
            Some(schedule.id),
            None,
            None,
        );
        last_epoch = Some(shift.start);
        last_user = Some(chosen);
    }

    if let Some(s) = tables.schedules.get_mut(&schedule.id) {
        s.last_epoch_scheduled = last_epoch;
        s.last_scheduled_user_id = last_user;
    }
}

fn rank_candidates(
    tables: &Tables,
    team_id: TeamId,
    role_id: RoleId,
    roster_members: &[(UserId, i32)],
    candidates: &[UserId],
    shift: Shift,
) -> UserId {
    let priority_of = |uid: UserId| {
        roster_members
            .iter()
            .find(|(u, _)| *u == uid)
            .map(|(_, p)| *p)
            .unwrap_or(i32::MAX)
    };

    let mut scored: Vec<(UserId, i64, i64, i32)> = candidates
        .iter()
        .map(|&uid| {
            let time_since_last = time_since_last_event(tables, team_id, role_id, uid, shift.start);
            let time_to_next = time_to_next_event(tables, team_id, role_id, uid, shift.end);
            (uid, time_since_last, time_to_next, priority_of(uid))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then(b.2.cmp(&a.2))
            .then(a.3.cmp(&b.3))
            .then(a.0.cmp(&b.0))
    });
    scored[0].0
}

fn time_since_last_event(
    tables: &Tables,
    team_id: TeamId,
    role_id: RoleId,
    user_id: UserId,
    shift_start: i64,
) -> i64 {
    tables
        .events
        .values()
        .filter(|e| e.team_id == team_id && e.role_id == role_id && e.user_id == user_id && e.end <= shift_start)
        .map(|e| shift_start - e.end)
        .min()
        .unwrap_or(i64::MAX)
}

fn time_to_next_event(
    tables: &Tables,
    team_id: TeamId,
    role_id: RoleId,
    user_id: UserId,
    shift_end: i64,
) -> i64 {
    tables
        .events
        .values()
        .filter(|e| e.team_id == team_id && e.role_id == role_id && e.user_id == user_id && e.start >= shift_end)
        .map(|e| e.start - shift_end)
        .min()
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_longest_idle_candidate() {
        let mut tables = Tables::seeded();
        tables.insert_team("sre", "UTC").unwrap();
        let team_id = tables.team_id_by_name("sre").unwrap();
        tables.insert_user("a", "A").unwrap();
        tables.insert_user("b", "B").unwrap();
        let a = tables.user_id_by_name("a").unwrap();
        let b = tables.user_id_by_name("b").unwrap();
        tables.add_team_user(team_id, a);
        tables.add_team_user(team_id, b);
        let roster_id = tables.insert_roster(team_id, "primary").unwrap();
        tables.set_roster_user(roster_id, a, true, 0);
        tables.set_roster_user(roster_id, b, true, 1);

        // `a` had a shift ending recently; `b` never has.
        tables
            .insert_event(0, 3600, a, team_id, 1, None, None, None)
            .unwrap();

        let members = tables.in_rotation_members(roster_id, team_id);
        let chosen = rank_candidates(&tables, team_id, 1, &members, &[a, b], Shift { start: 7200, end: 10800 });
        assert_eq!(chosen, b);
    }

    #[test]
    fn ties_break_by_priority_then_id() {
        let mut tables = Tables::seeded();
        tables.insert_team("sre", "UTC").unwrap();
        let team_id = tables.team_id_by_name("sre").unwrap();
        tables.insert_user("a", "A").unwrap();
        tables.insert_user("b", "B").unwrap();
        let a = tables.user_id_by_name("a").unwrap();
        let b = tables.user_id_by_name("b").unwrap();
        let roster_id = tables.insert_roster(team_id, "primary").unwrap();
        tables.set_roster_user(roster_id, a, true, 0);
        tables.set_roster_user(roster_id, b, true, 1);

        let members = tables.in_rotation_members(roster_id, team_id);
        let chosen = rank_candidates(&tables, team_id, 1, &members, &[b, a], Shift { start: 0, end: 3600 });
        assert_eq!(chosen, a);
    }
}
