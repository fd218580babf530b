use serde::{Deserialize, Serialize};

use super::{RoleId, TeamId, UserId};

/// Closed set of contact/notification modes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContactMode {
    Email,
    Sms,
    Call,
    Im,
    Slack,
    Hipchat,
    Rocketchat,
}

impl ContactMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactMode::Email => "email",
            ContactMode::Sms => "sms",
            ContactMode::Call => "call",
            ContactMode::Im => "im",
            ContactMode::Slack => "slack",
            ContactMode::Hipchat => "hipchat",
            ContactMode::Rocketchat => "rocketchat",
        }
    }
}

/// `user_contact` relation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserContact {
    pub user_id: UserId,
    pub mode: ContactMode,
    pub destination: String,
}

/// `notification_type` relation — a static, named catalog of event
/// actions (`event_created`, `event_edited`, ...) and reminder kinds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationType {
    pub name: String,
    pub is_reminder: bool,
    pub subject_template: String,
    pub body_template: String,
}

/// A user's subscription to notifications for one team/roles combination.
/// Exactly one of `time_before` / `only_if_involved` is set, matching
/// whether `notification_type` is a reminder type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationSetting {
    pub id: i64,
    pub user_id: UserId,
    pub team_id: TeamId,
    pub mode: ContactMode,
    pub type_name: String,
    pub roles: Vec<RoleId>,
    pub time_before: Option<i64>,
    pub only_if_involved: Option<bool>,
}

/// A pending outbound notification, enqueued by the sink and drained by
/// the notifier's poller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationQueueEntry {
    pub id: i64,
    pub user_id: UserId,
    pub mode: ContactMode,
    pub type_name: String,
    pub send_time: i64,
    pub context: serde_json::Value,
    pub active: bool,
    pub sent: bool,
}
