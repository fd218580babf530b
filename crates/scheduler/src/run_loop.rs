//! Periodic driver grounded on `oncall/bin/scheduler.py`: one transaction
//! per active team per cycle, per-team failures logged and skipped, sleep
//! for whatever remains of `cycle_seconds` after the work.

use std::time::{Duration, Instant};

use oncall_domain::{time, Result};
use oncall_store::Store;

pub async fn run_loop(store: &Store, cycle_seconds: u64) {
    loop {
        let start = Instant::now();
        run_cycle(store).await;
        let elapsed = start.elapsed();
        let cycle = Duration::from_secs(cycle_seconds.max(1));
        if elapsed < cycle {
            tracing::info!(
                elapsed_secs = elapsed.as_secs_f64(),
                "scheduling cycle finished, sleeping"
            );
            tokio::time::sleep(cycle - elapsed).await;
        } else {
            tracing::warn!(
                elapsed_secs = elapsed.as_secs_f64(),
                cycle_seconds,
                "scheduling cycle took longer than cycle time, skipping sleep"
            );
        }
    }
}

async fn run_cycle(store: &Store) {
    let now = time::now();
    let team_ids: Vec<_> = store
        .read(|t| t.teams.values().filter(|tm| tm.active).map(|tm| tm.id).collect::<Vec<_>>())
        .await;

    for team_id in team_ids {
        tracing::info!(team_id, "scheduling for team");
        let result = store
            .transact(move |tables| -> Result<()> {
                let schedule_ids = tables.schedules_for_team(team_id);
                crate::default::schedule_team(tables, team_id, &schedule_ids, now);
                crate::round_robin::schedule_team(tables, team_id, &schedule_ids, now);
                Ok(())
            })
            .await;
        if let Err(e) = result {
            tracing::error!(team_id, error = %e, "scheduling cycle failed for team, continuing");
        }
    }
}
