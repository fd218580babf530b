//! The data model, as plain serde-able Rust structs.

mod audit;
mod auth;
mod event;
mod notification;
mod roster;
mod schedule;
mod subscription;
mod team;
mod user;

pub use audit::AuditLogEntry;
pub use auth::{Application, IcalKeyRecord, IcalPrincipalType, Principal, Session};
pub use event::Event;
pub use notification::{
    ContactMode, NotificationQueueEntry, NotificationSetting, NotificationType, UserContact,
};
pub use roster::{Roster, RosterUser};
pub use schedule::{normalize_schedule_events, Schedule, ScheduleEvent, SchedulerKind};
pub use subscription::TeamSubscription;
pub use team::{DeletedTeam, PinnedTeam, Team, TeamAdmin, TeamUser};
pub use user::User;

pub type TeamId = i64;
pub type UserId = i64;
pub type RoleId = i64;
pub type RosterId = i64;
pub type ScheduleId = i64;
pub type EventId = i64;

/// 128-char hex token grouping linked events.
pub type LinkId = String;

/// Generate a 128-char hex `link_id`, matching the upstream project's
/// token shape.
pub fn new_link_id() -> LinkId {
    use rand::RngCore;
    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex_encode(&bytes)
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

/// A role a schedule/event belongs to (e.g. "primary", "secondary").
/// Roles are a small open set of names; we key them by id like other
/// relations but expose the name directly since nothing else hangs off
/// a `Role` row in this subsystem.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}
