use oncall_domain::model::*;
use oncall_domain::{Error, Result};

use crate::tables::Tables;

impl Tables {
    pub fn insert_user(&mut self, name: &str, full_name: &str) -> Result<UserId> {
        if self.users.values().any(|u| u.name == name) {
            return Err(Error::conflict(format!("user '{name}' already exists")));
        }
        self.next_user_id += 1;
        let id = self.next_user_id;
        self.users.insert(id, User::new(id, name, full_name));
        Ok(id)
    }

    pub fn add_contact(&mut self, user_id: UserId, mode: ContactMode, destination: &str) {
        self.user_contacts.push(UserContact {
            user_id,
            mode,
            destination: destination.to_string(),
        });
    }

    pub fn has_call_contact(&self, user_id: UserId) -> bool {
        self.user_contacts
            .iter()
            .any(|c| c.user_id == user_id && c.mode == ContactMode::Call)
    }

    /// Users with a future event but no `call` contact.
    pub fn users_missing_call_contact(&self, now: i64) -> Vec<UserId> {
        let mut offenders: Vec<UserId> = self
            .events
            .values()
            .filter(|e| e.end > now)
            .map(|e| e.user_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .filter(|uid| !self.has_call_contact(*uid))
            .collect();
        offenders.sort();
        offenders
    }
}
