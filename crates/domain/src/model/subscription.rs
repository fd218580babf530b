use serde::{Deserialize, Serialize};

use super::{RoleId, TeamId};

/// `team_id` listens to `subscription_id`'s events of `role_id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TeamSubscription {
    pub team_id: TeamId,
    pub subscription_id: TeamId,
    pub role_id: RoleId,
}
