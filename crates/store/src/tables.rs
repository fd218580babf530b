//! `Tables` is the in-memory relational store: one
//! collection per relation. It is plain data — all
//! transactional behavior lives in [`crate::Store`].

use std::collections::{HashMap, HashSet};

use oncall_domain::model::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tables {
    pub teams: HashMap<TeamId, Team>,
    pub next_team_id: TeamId,
    pub deleted_teams: Vec<DeletedTeam>,
    pub pinned_teams: HashSet<PinnedTeam>,

    pub users: HashMap<UserId, User>,
    pub next_user_id: UserId,
    pub user_contacts: Vec<UserContact>,

    pub team_admins: HashSet<TeamAdmin>,
    pub team_users: HashSet<TeamUser>,

    pub rosters: HashMap<RosterId, Roster>,
    pub next_roster_id: RosterId,
    pub roster_users: Vec<RosterUser>,

    pub roles: HashMap<RoleId, Role>,
    pub next_role_id: RoleId,

    pub schedules: HashMap<ScheduleId, Schedule>,
    pub next_schedule_id: ScheduleId,

    pub events: HashMap<EventId, Event>,
    pub next_event_id: EventId,

    pub team_subscriptions: HashSet<TeamSubscription>,

    pub notification_types: HashMap<String, NotificationType>,
    pub notification_settings: HashMap<i64, NotificationSetting>,
    pub next_notification_setting_id: i64,
    pub notification_queue: HashMap<i64, NotificationQueueEntry>,
    pub next_notification_queue_id: i64,

    pub audit_log: Vec<AuditLogEntry>,
    pub next_audit_id: i64,

    pub ical_keys: HashMap<String, IcalKeyRecord>,
    pub sessions: HashMap<String, Session>,
    pub applications: HashMap<String, Application>,

    /// `scheduler(name)` — the static set of loadable scheduler names.
    pub schedulers: HashSet<String>,
}

impl Tables {
    /// Seed the static reference tables (`scheduler`, `notification_type`)
    /// and any default roles, matching the fixture data an upstream
    /// migration would load.
    pub fn seeded() -> Self {
        let mut t = Tables::default();
        t.schedulers.insert("default".to_string());
        t.schedulers.insert("round-robin".to_string());

        for (i, name) in ["primary", "secondary", "shadow"].iter().enumerate() {
            let id = (i + 1) as RoleId;
            t.roles.insert(id, Role { id, name: name.to_string() });
        }
        t.next_role_id = 4;

        for (name, is_reminder, subject, body) in [
            (
                "event_created",
                false,
                "New on-call shift",
                "%(full_name)s is now on-call for %(team)s %(role)s.",
            ),
            (
                "event_edited",
                false,
                "On-call shift changed",
                "A %(team)s %(role)s shift was edited.",
            ),
            (
                "event_deleted",
                false,
                "On-call shift deleted",
                "A %(team)s %(role)s shift was deleted.",
            ),
            (
                "event_swapped",
                false,
                "On-call shift swapped",
                "A %(team)s %(role)s shift was swapped.",
            ),
            (
                "event_substituted",
                false,
                "On-call shift overridden",
                "A %(team)s %(role)s shift was overridden.",
            ),
            (
                "event_reminder",
                true,
                "Upcoming on-call shift",
                "%(full_name)s, your %(team)s %(role)s shift starts soon.",
            ),
        ] {
            t.notification_types.insert(
                name.to_string(),
                NotificationType {
                    name: name.to_string(),
                    is_reminder,
                    subject_template: subject.to_string(),
                    body_template: body.to_string(),
                },
            );
        }
        t
    }

    pub fn role_id_by_name(&self, name: &str) -> Option<RoleId> {
        self.roles.values().find(|r| r.name == name).map(|r| r.id)
    }

    pub fn team_id_by_name(&self, name: &str) -> Option<TeamId> {
        self.teams.values().find(|t| t.name == name).map(|t| t.id)
    }

    pub fn user_id_by_name(&self, name: &str) -> Option<UserId> {
        self.users.values().find(|u| u.name == name).map(|u| u.id)
    }

    pub fn is_team_member(&self, team_id: TeamId, user_id: UserId) -> bool {
        self.team_users.contains(&TeamUser { team_id, user_id })
    }

    pub fn is_team_admin(&self, team_id: TeamId, user_id: UserId) -> bool {
        self.team_admins.contains(&TeamAdmin { team_id, user_id })
    }
}
