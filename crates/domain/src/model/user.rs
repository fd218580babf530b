use serde::{Deserialize, Serialize};

use super::UserId;

/// A person who can be scheduled for on-call shifts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub full_name: String,
    pub time_zone: String,
    pub photo_url: Option<String>,
    pub active: bool,
    /// Bypasses all authorization predicates ("God user").
    pub god: bool,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            full_name: full_name.into(),
            time_zone: "UTC".to_string(),
            photo_url: None,
            active: true,
            god: false,
        }
    }
}
