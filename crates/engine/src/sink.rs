//! The Notification & Audit Sink: every mutation, on success, writes
//! exactly one audit row and enqueues zero or more notification rows,
//! called from inside the same transaction as the mutation it
//! describes, so a later failure rolls both back together.

use oncall_domain::model::*;
use oncall_domain::time;
use oncall_store::Tables;

#[allow(clippy::too_many_arguments)]
pub fn record(
    tables: &mut Tables,
    team_id: TeamId,
    principal: &Principal,
    action_name: &str,
    notification_type: &str,
    affected_role_ids: &[RoleId],
    affected_user_ids: &[UserId],
    start_time: i64,
    context: serde_json::Value,
) {
    let team_name = tables
        .teams
        .get(&team_id)
        .map(|t| t.name.clone())
        .unwrap_or_default();
    tables.insert_audit_log(&team_name, principal.owner_name(), action_name, context.clone());

    let Some(nt) = tables.notification_types.get(notification_type).cloned() else {
        tracing::warn!(notification_type, "unknown notification type, skipping enqueue");
        return;
    };

    let now = time::now();

    for &user_id in affected_user_ids {
        let settings: Vec<NotificationSetting> = tables
            .notification_settings_for(user_id, team_id, &nt.name)
            .into_iter()
            .cloned()
            .collect();
        for setting in settings {
            let role_matches = setting.roles.is_empty()
                || setting.roles.iter().any(|r| affected_role_ids.contains(r));
            if !role_matches {
                continue;
            }
            if setting.only_if_involved == Some(true) && !affected_user_ids.contains(&user_id) {
                continue;
            }
            let send_time = if nt.is_reminder {
                start_time - setting.time_before.unwrap_or(0)
            } else {
                now
            };
            if nt.is_reminder && send_time <= now {
                continue;
            }
            tables.enqueue_notification(user_id, setting.mode, &nt.name, send_time, context.clone());
        }
    }
}
