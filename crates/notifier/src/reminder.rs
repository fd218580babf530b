//! Reminder sweeper: periodically enqueues reminder rows
//! near upcoming shifts, de-duplicated by `(user, type, event)`.

use std::sync::Arc;
use std::time::Duration;

use oncall_domain::{time, Result};
use oncall_store::Store;

pub async fn sweep_once(store: &Store, lookahead_seconds: i64) {
    let result = store
        .transact(move |t| -> Result<()> {
            let now = time::now();
            let team_ids: Vec<_> = t.teams.values().filter(|tm| tm.active).map(|tm| tm.id).collect();
            for team_id in team_ids {
                let settings: Vec<_> = t.reminder_settings_for_team(team_id).into_iter().cloned().collect();
                if settings.is_empty() {
                    continue;
                }
                let events: Vec<_> = t
                    .events_in_range(team_id, None, now, now + lookahead_seconds)
                    .into_iter()
                    .map(|id| t.events[&id].clone())
                    .collect();

                for setting in &settings {
                    let Some(time_before) = setting.time_before else {
                        continue;
                    };
                    for event in &events {
                        if event.user_id != setting.user_id {
                            continue;
                        }
                        if !setting.roles.is_empty() && !setting.roles.contains(&event.role_id) {
                            continue;
                        }
                        let send_time = event.start - time_before;
                        if send_time < now {
                            continue;
                        }
                        let already_queued = t.notification_queue.values().any(|q| {
                            q.type_name == setting.type_name
                                && q.user_id == setting.user_id
                                && q.context.get("event_id").and_then(|v| v.as_i64()) == Some(event.id)
                        });
                        if already_queued {
                            continue;
                        }
                        t.enqueue_notification(
                            setting.user_id,
                            setting.mode,
                            &setting.type_name,
                            send_time,
                            serde_json::json!({"event_id": event.id}),
                        );
                    }
                }
            }
            Ok(())
        })
        .await;
    if let Err(e) = result {
        tracing::error!(error = %e, "reminder sweep failed");
    }
}

pub async fn run_loop(store: Arc<Store>, interval_seconds: u64, lookahead_seconds: i64) {
    loop {
        sweep_once(&store, lookahead_seconds).await;
        tokio::time::sleep(Duration::from_secs(interval_seconds.max(1))).await;
    }
}
