use oncall_domain::model::*;
use oncall_domain::{time, Result};

use crate::tables::Tables;

impl Tables {
    pub fn insert_audit_log(
        &mut self,
        team_name: &str,
        owner_name: &str,
        action_name: &str,
        context: serde_json::Value,
    ) {
        self.next_audit_id += 1;
        self.audit_log.push(AuditLogEntry {
            id: self.next_audit_id,
            team_name: team_name.to_string(),
            owner_name: owner_name.to_string(),
            action_name: action_name.to_string(),
            timestamp: time::now(),
            context,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert_notification_setting(
        &mut self,
        user_id: UserId,
        team_id: TeamId,
        mode: ContactMode,
        type_name: &str,
        roles: Vec<RoleId>,
        time_before: Option<i64>,
        only_if_involved: Option<bool>,
    ) -> i64 {
        self.next_notification_setting_id += 1;
        let id = self.next_notification_setting_id;
        self.notification_settings.insert(
            id,
            NotificationSetting {
                id,
                user_id,
                team_id,
                mode,
                type_name: type_name.to_string(),
                roles,
                time_before,
                only_if_involved,
            },
        );
        id
    }

    pub fn delete_notification_setting(&mut self, id: i64) -> bool {
        self.notification_settings.remove(&id).is_some()
    }

    pub fn notification_settings_for(
        &self,
        user_id: UserId,
        team_id: TeamId,
        type_name: &str,
    ) -> Vec<&NotificationSetting> {
        self.notification_settings
            .values()
            .filter(|s| s.user_id == user_id && s.team_id == team_id && s.type_name == type_name)
            .collect()
    }

    /// Reminder-kind settings for any user on the team, used by the
    /// reminder sweeper to decide who gets a heads-up before a shift
    /// starts and how far in advance.
    pub fn reminder_settings_for_team(&self, team_id: TeamId) -> Vec<&NotificationSetting> {
        self.notification_settings
            .values()
            .filter(|s| {
                s.team_id == team_id
                    && self
                        .notification_types
                        .get(&s.type_name)
                        .map(|t| t.is_reminder)
                        .unwrap_or(false)
            })
            .collect()
    }

    pub fn enqueue_notification(
        &mut self,
        user_id: UserId,
        mode: ContactMode,
        type_name: &str,
        send_time: i64,
        context: serde_json::Value,
    ) -> i64 {
        self.next_notification_queue_id += 1;
        let id = self.next_notification_queue_id;
        self.notification_queue.insert(
            id,
            NotificationQueueEntry {
                id,
                user_id,
                mode,
                type_name: type_name.to_string(),
                send_time,
                context,
                active: true,
                sent: false,
            },
        );
        id
    }

    /// Active, unsent entries whose `send_time` has arrived, ordered so
    /// the poller drains oldest-first.
    pub fn due_notifications(&self, now: i64) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .notification_queue
            .values()
            .filter(|n| n.active && !n.sent && n.send_time <= now)
            .map(|n| n.id)
            .collect();
        ids.sort_by_key(|id| self.notification_queue[id].send_time);
        ids
    }

    pub fn mark_notification_sent(&mut self, id: i64) {
        if let Some(entry) = self.notification_queue.get_mut(&id) {
            entry.sent = true;
            entry.active = false;
        }
    }

    /// Terminal failure: deactivate without marking sent, so it is never
    /// retried.
    pub fn deactivate_notification(&mut self, id: i64) {
        if let Some(entry) = self.notification_queue.get_mut(&id) {
            entry.active = false;
        }
    }
}
