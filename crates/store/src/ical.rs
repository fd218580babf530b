use oncall_domain::model::*;
use oncall_domain::time;

use crate::tables::Tables;

impl Tables {
    /// Mint (or return the existing) iCal key for one `(principal_type,
    /// principal_id)` pair, so repeated subscribe calls are idempotent.
    pub fn issue_ical_key(
        &mut self,
        requester: UserId,
        name: &str,
        principal_type: IcalPrincipalType,
        principal_id: i64,
    ) -> String {
        if let Some(existing) = self.ical_keys.values().find(|k| {
            k.principal_type == principal_type && k.principal_id == principal_id
        }) {
            return existing.key.clone();
        }
        let key = new_link_id();
        self.ical_keys.insert(
            key.clone(),
            IcalKeyRecord {
                key: key.clone(),
                requester,
                name: name.to_string(),
                principal_type,
                time_created: time::now(),
                principal_id,
            },
        );
        key
    }

    pub fn ical_key_record(&self, key: &str) -> Option<&IcalKeyRecord> {
        self.ical_keys.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issuing_twice_for_same_principal_returns_same_key() {
        let mut t = Tables::seeded();
        let k1 = t.issue_ical_key(1, "team feed", IcalPrincipalType::Team, 1);
        let k2 = t.issue_ical_key(1, "team feed", IcalPrincipalType::Team, 1);
        assert_eq!(k1, k2);
        assert_eq!(t.ical_keys.len(), 1);
    }

    #[test]
    fn different_principals_get_different_keys() {
        let mut t = Tables::seeded();
        let team_key = t.issue_ical_key(1, "team feed", IcalPrincipalType::Team, 1);
        let user_key = t.issue_ical_key(1, "my feed", IcalPrincipalType::User, 1);
        assert_ne!(team_key, user_key);
        assert_eq!(t.ical_key_record(&team_key).unwrap().principal_type, IcalPrincipalType::Team);
        assert_eq!(t.ical_key_record(&user_key).unwrap().principal_type, IcalPrincipalType::User);
    }

    #[test]
    fn unknown_key_returns_none() {
        let t = Tables::seeded();
        assert!(t.ical_key_record("nonexistent").is_none());
    }
}
