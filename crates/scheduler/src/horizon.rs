//! Walks a schedule's template events across repeating cycles to produce
//! concrete shift windows over `[from, to)`.

use oncall_domain::model::ScheduleEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub start: i64,
    pub end: i64,
}

pub fn shifts_for_schedule(
    events: &[ScheduleEvent],
    from: i64,
    to: i64,
    cycle_seconds: i64,
) -> Vec<Shift> {
    let mut shifts = Vec::new();
    if cycle_seconds <= 0 || to <= from {
        return shifts;
    }
    let mut cycle_start = from - from.rem_euclid(cycle_seconds);
    while cycle_start < to {
        for e in events {
            let start = cycle_start + e.start_offset_seconds;
            let end = start + e.duration_seconds;
            if end > from && start < to {
                shifts.push(Shift { start, end });
            }
        }
        cycle_start += cycle_seconds;
    }
    shifts.sort_by_key(|s| s.start);
    shifts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_one_week_at_a_time() {
        let events = vec![ScheduleEvent {
            start_offset_seconds: 0,
            duration_seconds: 7 * 24 * 3600,
        }];
        let shifts = shifts_for_schedule(&events, 0, 3 * 7 * 24 * 3600, 7 * 24 * 3600);
        assert_eq!(shifts.len(), 3);
        assert_eq!(shifts[1].start, 7 * 24 * 3600);
    }

    #[test]
    fn empty_window_yields_nothing() {
        let events = vec![ScheduleEvent {
            start_offset_seconds: 0,
            duration_seconds: 100,
        }];
        assert!(shifts_for_schedule(&events, 10, 10, 604_800).is_empty());
    }
}
