//! Preview materialization: run the scheduler against a private clone of the store
//! snapshot and report what it would have inserted, without committing.

use std::collections::HashSet;

use oncall_domain::model::{Event, ScheduleId, TeamId};
use oncall_store::Store;

pub async fn preview_schedule(store: &Store, team_id: TeamId, schedule_id: ScheduleId, now: i64) -> Vec<Event> {
    let mut scratch = store.read(|t| t.clone()).await;
    let before: HashSet<_> = scratch.events.keys().copied().collect();

    crate::default::schedule_team(&mut scratch, team_id, &[schedule_id], now);
    crate::round_robin::schedule_team(&mut scratch, team_id, &[schedule_id], now);

    let mut generated: Vec<Event> = scratch
        .events
        .into_iter()
        .filter(|(id, _)| !before.contains(id))
        .map(|(_, e)| e)
        .collect();
    generated.sort_by_key(|e| e.start);
    generated
}
