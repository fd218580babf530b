//! Event swap: exchange the
//! user on two event groups, each either a single event or a full linked
//! group. Swapping breaks a group's `link_id` unless the caller marked
//! that side as `linked`.

use oncall_domain::model::*;
use oncall_domain::{time, Error, Result};
use oncall_store::Tables;

use crate::sink;

pub struct SwapSide {
    pub id: String,
    pub linked: bool,
}

fn resolve_side(tables: &Tables, side: &SwapSide) -> Result<Vec<EventId>> {
    let ids = if side.linked {
        tables.events_for_link(&side.id)
    } else {
        let id: EventId = side
            .id
            .parse()
            .map_err(|_| Error::bad_request("event id must be an integer"))?;
        if tables.events.contains_key(&id) {
            vec![id]
        } else {
            vec![]
        }
    };
    if ids.is_empty() {
        return Err(Error::not_found(format!("event(s) '{}' not found", side.id)));
    }
    Ok(ids)
}

pub fn swap_events(
    tables: &mut Tables,
    principal: &Principal,
    side_0: SwapSide,
    side_1: SwapSide,
    now: i64,
) -> Result<()> {
    let ids_0 = resolve_side(tables, &side_0)?;
    let ids_1 = resolve_side(tables, &side_1)?;

    let events_0: Vec<Event> = ids_0.iter().map(|id| tables.events[id].clone()).collect();
    let events_1: Vec<Event> = ids_1.iter().map(|id| tables.events[id].clone()).collect();

    if events_0.iter().chain(&events_1).any(|e| e.start < now - time::GRACE_PERIOD) {
        return Err(Error::bad_request("cannot swap events that started in the past"));
    }

    let team_ids: std::collections::HashSet<TeamId> =
        events_0.iter().chain(&events_1).map(|e| e.team_id).collect();
    if team_ids.len() > 1 {
        return Err(Error::bad_request("swapped events must come from the same team"));
    }
    let team_id = *team_ids.iter().next().ok_or_else(|| Error::bad_request("no events to swap"))?;

    for group in [&events_0, &events_1] {
        if group.len() > 1 {
            let users: std::collections::HashSet<UserId> = group.iter().map(|e| e.user_id).collect();
            if users.len() != 1 {
                return Err(Error::bad_request(
                    "all linked events within one swap side must share the same user",
                ));
            }
        }
    }

    let user_0 = events_0[0].user_id;
    let user_1 = events_1[0].user_id;
    let role_0 = events_0[0].role_id;
    let role_1 = events_1[0].role_id;
    let first_start_0 = events_0.iter().map(|e| e.start).min().unwrap();
    let first_start_1 = events_1.iter().map(|e| e.start).min().unwrap();

    for id in &ids_0 {
        let e = tables.events.get_mut(id).expect("resolved above");
        e.user_id = user_1;
        if !side_0.linked {
            e.link_id = None;
        }
    }
    for id in &ids_1 {
        let e = tables.events.get_mut(id).expect("resolved above");
        e.user_id = user_0;
        if !side_1.linked {
            e.link_id = None;
        }
    }

    sink::record(
        tables,
        team_id,
        principal,
        "event_swapped",
        "event_swapped",
        &[role_0, role_1],
        &[user_0, user_1],
        first_start_0.min(first_start_1),
        serde_json::json!({
            "swapped_ids_0": ids_0,
            "swapped_ids_1": ids_1,
        }),
    );
    Ok(())
}
