//! The round-robin scheduler: cycles through a schedule's `ScheduleOrder`, resuming
//! after the last-scheduled user.

use oncall_domain::model::*;
use oncall_store::Tables;

use crate::horizon::shifts_for_schedule;

pub fn schedule_team(tables: &mut Tables, team_id: TeamId, schedule_ids: &[ScheduleId], now: i64) {
    for &schedule_id in schedule_ids {
        let Some(schedule) = tables.schedules.get(&schedule_id).cloned() else {
            continue;
        };
        if matches!(schedule.scheduler, SchedulerKind::RoundRobin) {
            schedule_one(tables, team_id, schedule, now);
        }
    }
}

fn schedule_one(tables: &mut Tables, team_id: TeamId, schedule: Schedule, now: i64) {
    let Some(order) = schedule.schedule_order.clone() else {
        return;
    };
    if order.is_empty() {
        return;
    }

    let cycle = schedule.cycle_seconds();
    let from = schedule
        .last_epoch_scheduled
        .map(|e| e + cycle)
        .unwrap_or(now);
    let to = now + schedule.auto_populate_threshold * 86_400;
    let shifts = shifts_for_schedule(&schedule.events, from, to, cycle);

    // Resume one past the last-scheduled user; if that user has since
    // left the order, restart at position 0.
    let mut cursor = schedule
        .last_scheduled_user_id
        .and_then(|uid| order.iter().position(|&u| u == uid))
        .map(|pos| (pos + 1) % order.len())
        .unwrap_or(0);

    let mut last_epoch = schedule.last_epoch_scheduled;
    let mut last_user = schedule.last_scheduled_user_id;

    for shift in shifts {
        if !tables
            .overlapping_events(team_id, schedule.role_id, shift.start, shift.end, None)
            .is_empty()
        {
            continue;
        }

        let mut chosen = None;
        for step in 0..order.len() {
            let idx = (cursor + step) % order.len();
            let uid = order[idx];
            let in_rotation = tables.roster_users.iter().any(|ru| {
                ru.roster_id == schedule.roster_id && ru.user_id == uid && ru.in_rotation
            });
            if !in_rotation {
                continue;
            }
            // Busy spans every role on the team, not just this schedule's
            // role, so a user can't be double-booked across two roles at
            // the same time.
            let busy = tables
                .events_in_range(team_id, None, shift.start, shift.end)
                .into_iter()
                .any(|id| tables.events[&id].user_id == uid);
            if busy {
                continue;
            }
            chosen = Some((idx, uid));
            break;
        }

        let Some((idx, uid)) = chosen else {
            // full cycle exhausted with nobody available; skip this shift
            continue;
        };

        let _ = tables.insert_event(
            shift.start,
            shift.end,
            uid,
            team_id,
            schedule.role_id,
            Some(schedule.id),
            None,
            None,
        );
        cursor = (idx + 1) % order.len();
        last_epoch = Some(shift.start);
        last_user = Some(uid);
    }

    if let Some(s) = tables.schedules.get_mut(&schedule.id) {
        s.last_epoch_scheduled = last_epoch;
        s.last_scheduled_user_id = last_user;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_through_schedule_order_in_sequence() {
        let mut tables = Tables::seeded();
        tables.insert_team("sre", "UTC").unwrap();
        let team_id = tables.team_id_by_name("sre").unwrap();
        for name in ["a", "b", "c"] {
            tables.insert_user(name, name).unwrap();
        }
        let a = tables.user_id_by_name("a").unwrap();
        let b = tables.user_id_by_name("b").unwrap();
        let c = tables.user_id_by_name("c").unwrap();
        let roster_id = tables.insert_roster(team_id, "primary").unwrap();
        for uid in [a, b, c] {
            tables.set_roster_user(roster_id, uid, true, 0);
        }
        let schedule_id = tables
            .insert_schedule(
                team_id,
                roster_id,
                1,
                SchedulerKind::RoundRobin,
                21,
                true,
                vec![ScheduleEvent {
                    start_offset_seconds: 0,
                    duration_seconds: 12 * 3600,
                }],
            )
            .unwrap();
        tables.set_schedule_order(schedule_id, vec![a, b, c]).unwrap();

        schedule_team(&mut tables, team_id, &[schedule_id], 0);

        let mut events: Vec<_> = tables.events.values().collect();
        events.sort_by_key(|e| e.start);
        assert_eq!(events[0].user_id, a);
        assert_eq!(events[1].user_id, b);
        assert_eq!(events[2].user_id, c);
    }
}
