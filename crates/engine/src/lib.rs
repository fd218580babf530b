pub mod events;
pub mod override_event;
pub mod sink;
pub mod swap;

pub use events::{
    create_event, create_linked_events, delete_event, delete_linked_events, edit_event,
    edit_linked_events,
};
pub use override_event::override_events;
pub use swap::{swap_events, SwapSide};

#[cfg(test)]
mod tests {
    use oncall_domain::model::*;
    use oncall_store::Tables;

    fn setup() -> (Tables, TeamId, RoleId) {
        let mut tables = Tables::seeded();
        tables.insert_team("sre", "UTC").unwrap();
        let team_id = tables.team_id_by_name("sre").unwrap();
        tables.insert_user("a", "A").unwrap();
        tables.insert_user("b", "B").unwrap();
        let a = tables.user_id_by_name("a").unwrap();
        let b = tables.user_id_by_name("b").unwrap();
        tables.add_team_user(team_id, a);
        tables.add_team_user(team_id, b);
        let role_id = tables.role_id_by_name("primary").unwrap();
        (tables, team_id, role_id)
    }

    fn god() -> Principal {
        Principal::User { id: 1, name: "god".into() }
    }

    #[test]
    fn create_rejects_overlap() {
        let (mut tables, _team_id, _role_id) = setup();
        super::create_event(&mut tables, &god(), "sre", "primary", "a", 0, 3600, None).unwrap();
        let err = super::create_event(&mut tables, &god(), "sre", "primary", "b", 1800, 5400, None);
        assert!(err.is_err());
    }

    #[test]
    fn override_splits_event_into_two() {
        let (mut tables, team_id, role_id) = setup();
        let id = tables
            .insert_event(0, 10_000, tables.user_id_by_name("a").unwrap(), team_id, role_id, None, None, None)
            .unwrap();
        super::override_events(&mut tables, &god(), &[id], 2000, 4000, "b", -100_000).unwrap();

        assert!(!tables.events.contains_key(&id));
        let mut remaining: Vec<_> = tables.events.values().collect();
        remaining.sort_by_key(|e| e.start);
        assert_eq!(remaining.len(), 3);
        assert_eq!(remaining[0].end, 2000);
        assert_eq!(remaining[1].user_id, tables.user_id_by_name("b").unwrap());
        assert_eq!(remaining[2].start, 4000);
    }

    #[test]
    fn swap_exchanges_users() {
        let (mut tables, team_id, role_id) = setup();
        let a = tables.user_id_by_name("a").unwrap();
        let b = tables.user_id_by_name("b").unwrap();
        let e0 = tables.insert_event(0, 3600, a, team_id, role_id, None, None, None).unwrap();
        let e1 = tables.insert_event(7200, 10_800, b, team_id, role_id, None, None, None).unwrap();

        super::swap_events(
            &mut tables,
            &god(),
            super::SwapSide { id: e0.to_string(), linked: false },
            super::SwapSide { id: e1.to_string(), linked: false },
            -100_000,
        )
        .unwrap();

        assert_eq!(tables.events[&e0].user_id, b);
        assert_eq!(tables.events[&e1].user_id, a);
    }

    #[test]
    fn create_linked_events_share_one_link_id() {
        let (mut tables, _team_id, _role_id) = setup();
        let ids = super::create_linked_events(
            &mut tables,
            &god(),
            "sre",
            "primary",
            &[("a".into(), 0, 3600), ("b".into(), 3600, 7200)],
        )
        .unwrap();
        assert_eq!(ids.len(), 2);
        let link_id = tables.events[&ids[0]].link_id.clone();
        assert!(link_id.is_some());
        assert_eq!(tables.events[&ids[1]].link_id, link_id);
    }

    #[test]
    fn edit_linked_events_applies_to_every_member() {
        let (mut tables, _team_id, _role_id) = setup();
        let ids = super::create_linked_events(
            &mut tables,
            &god(),
            "sre",
            "primary",
            &[("a".into(), 0, 3600), ("a".into(), 3600, 7200)],
        )
        .unwrap();
        let link_id = tables.events[&ids[0]].link_id.clone().unwrap();

        super::edit_linked_events(&mut tables, &god(), &link_id, None, None, Some("b"), None, None).unwrap();

        let b = tables.user_id_by_name("b").unwrap();
        for id in &ids {
            assert_eq!(tables.events[id].user_id, b);
        }
    }

    #[test]
    fn delete_linked_events_removes_every_member() {
        let (mut tables, _team_id, _role_id) = setup();
        let ids = super::create_linked_events(
            &mut tables,
            &god(),
            "sre",
            "primary",
            &[("a".into(), 0, 3600), ("a".into(), 3600, 7200)],
        )
        .unwrap();
        let link_id = tables.events[&ids[0]].link_id.clone().unwrap();

        super::delete_linked_events(&mut tables, &god(), &link_id).unwrap();

        for id in &ids {
            assert!(!tables.events.contains_key(id));
        }
    }

    #[test]
    fn delete_linked_events_rejects_unknown_link() {
        let (mut tables, _team_id, _role_id) = setup();
        assert!(super::delete_linked_events(&mut tables, &god(), "nonexistent").is_err());
    }
}
