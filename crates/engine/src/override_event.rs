//! Event override / substitution, grounded on `event_override.py`: a
//! new user takes over `[start, end)` from a
//! consecutive run of existing events, which are edited, deleted, or
//! split to make room.

use oncall_domain::model::*;
use oncall_domain::{time, Error, Result};
use oncall_store::{require, Tables};

use crate::sink;

pub fn override_events(
    tables: &mut Tables,
    principal: &Principal,
    event_ids: &[EventId],
    start: i64,
    end: i64,
    substitute_user_name: &str,
    now: i64,
) -> Result<EventId> {
    if event_ids.is_empty() {
        return Err(Error::bad_request("event_ids must not be empty"));
    }
    if start >= end {
        return Err(Error::bad_request("override start time must be before end time"));
    }
    if start < now - time::GRACE_PERIOD {
        return Err(Error::bad_request("override start time cannot be in the past"));
    }

    let mut events: Vec<Event> = event_ids
        .iter()
        .map(|id| {
            tables
                .events
                .get(id)
                .cloned()
                .ok_or_else(|| Error::not_found(format!("event {id} not found")))
        })
        .collect::<Result<Vec<_>>>()?;
    events.sort_by_key(|e| e.start);

    let team_id = events[0].team_id;
    if events.iter().any(|e| e.team_id != team_id) {
        return Err(Error::bad_request("events must be from the same team"));
    }
    let role_id = events[0].role_id;
    if events.iter().any(|e| e.role_id != role_id) {
        return Err(Error::bad_request("events must have the same role"));
    }
    let original_user_id = events[0].user_id;
    if events.iter().any(|e| e.user_id != original_user_id) {
        return Err(Error::bad_request("events must have the same original user"));
    }

    for pair in events.windows(2) {
        if pair[0].end != pair[1].start {
            return Err(Error::bad_request("events must be consecutive"));
        }
    }

    let substitute_user_id = require(
        tables.user_id_by_name(substitute_user_name),
        "user",
        substitute_user_name,
    )?;
    if !tables.is_team_member(team_id, substitute_user_id) {
        return Err(Error::bad_request(format!(
            "substituting user '{substitute_user_name}' must be part of the team"
        )));
    }

    let min_start = events[0].start;
    let max_end = events[events.len() - 1].end;
    if start >= max_end || end <= min_start {
        return Err(Error::bad_request("override time range must overlap with the events"));
    }
    let override_start = start.max(min_start);
    let override_end = end.min(max_end);
    if override_start >= override_end {
        return Err(Error::bad_request(
            "override time range results in an invalid duration after truncation",
        ));
    }

    let mut to_delete = Vec::new();
    let mut to_split: Vec<Event> = Vec::new();

    for e in &events {
        if override_start <= e.start && override_end >= e.end {
            to_delete.push(e.id);
        } else if override_start > e.start && override_start < e.end && e.end <= override_end {
            tables.events.get_mut(&e.id).unwrap().end = override_start;
        } else if override_start <= e.start && e.start < override_end && override_end < e.end {
            tables.events.get_mut(&e.id).unwrap().start = override_end;
        } else if override_start > e.start && override_end < e.end {
            to_split.push(e.clone());
        } else if !(e.end > override_start && e.start < override_end) {
            return Err(Error::bad_request(format!(
                "event {} does not overlap with the override range",
                e.id
            )));
        }
    }

    for e in &to_split {
        tables.events.remove(&e.id);
        tables.insert_event(e.start, override_start, e.user_id, team_id, role_id, None, None, None)?;
        tables.insert_event(override_end, e.end, e.user_id, team_id, role_id, None, None, None)?;
    }
    for id in &to_delete {
        tables.events.remove(id);
    }

    let override_id = tables.insert_event(
        override_start,
        override_end,
        substitute_user_id,
        team_id,
        role_id,
        None,
        None,
        None,
    )?;

    sink::record(
        tables,
        team_id,
        principal,
        "event_substituted",
        "event_substituted",
        &[role_id],
        &[original_user_id, substitute_user_id],
        override_start,
        serde_json::json!({
            "overridden_event_ids": event_ids,
            "override_event_id": override_id,
        }),
    );
    Ok(override_id)
}
