//! Single-event and linked-group create/edit/delete.

use oncall_domain::model::*;
use oncall_domain::{time, Error, Result};
use oncall_store::{require, Tables};

use crate::sink;

fn check_no_overlap(
    tables: &Tables,
    team_id: TeamId,
    role_id: RoleId,
    start: i64,
    end: i64,
    excluding: Option<EventId>,
) -> Result<()> {
    if start >= end {
        return Err(Error::bad_request("event start must be before end"));
    }
    if !tables
        .overlapping_events(team_id, role_id, start, end, excluding)
        .is_empty()
    {
        return Err(Error::conflict(
            "event overlaps an existing event for this team and role",
        ));
    }
    Ok(())
}

pub fn create_event(
    tables: &mut Tables,
    principal: &Principal,
    team_name: &str,
    role_name: &str,
    user_name: &str,
    start: i64,
    end: i64,
    note: Option<String>,
) -> Result<EventId> {
    let team_id = require(tables.team_id_by_name(team_name), "team", team_name)?;
    let role_id = require(tables.role_id_by_name(role_name), "role", role_name)?;
    let user_id = require(tables.user_id_by_name(user_name), "user", user_name)?;
    if !tables.is_team_member(team_id, user_id) {
        return Err(Error::bad_request(format!(
            "user '{user_name}' must be a member of the team"
        )));
    }
    check_no_overlap(tables, team_id, role_id, start, end, None)?;

    let id = tables.insert_event(start, end, user_id, team_id, role_id, None, None, note)?;

    sink::record(
        tables,
        team_id,
        principal,
        "event_created",
        "event_created",
        &[role_id],
        &[user_id],
        start,
        serde_json::json!({"event_id": id}),
    );
    Ok(id)
}

/// Create a set of events sharing one fresh `link_id`: each
/// `(user, start, end)` triple becomes one event.
pub fn create_linked_events(
    tables: &mut Tables,
    principal: &Principal,
    team_name: &str,
    role_name: &str,
    members: &[(String, i64, i64)],
) -> Result<Vec<EventId>> {
    let team_id = require(tables.team_id_by_name(team_name), "team", team_name)?;
    let role_id = require(tables.role_id_by_name(role_name), "role", role_name)?;
    let link_id = new_link_id();

    let mut ids = Vec::with_capacity(members.len());
    let mut user_ids = Vec::with_capacity(members.len());
    for (user_name, start, end) in members {
        let user_id = require(tables.user_id_by_name(user_name), "user", user_name)?;
        if !tables.is_team_member(team_id, user_id) {
            return Err(Error::bad_request(format!(
                "user '{user_name}' must be a member of the team"
            )));
        }
        check_no_overlap(tables, team_id, role_id, *start, *end, None)?;
        let id = tables.insert_event(
            *start,
            *end,
            user_id,
            team_id,
            role_id,
            None,
            Some(link_id.clone()),
            None,
        )?;
        ids.push(id);
        user_ids.push(user_id);
    }

    let first_start = members.iter().map(|(_, s, _)| *s).min().unwrap_or_else(time::now);
    sink::record(
        tables,
        team_id,
        principal,
        "event_created",
        "event_created",
        &[role_id],
        &user_ids,
        first_start,
        serde_json::json!({"event_ids": ids, "link_id": link_id}),
    );
    Ok(ids)
}

pub fn edit_event(
    tables: &mut Tables,
    principal: &Principal,
    event_id: EventId,
    new_start: Option<i64>,
    new_end: Option<i64>,
    new_user_name: Option<&str>,
) -> Result<()> {
    let existing = tables
        .events
        .get(&event_id)
        .cloned()
        .ok_or_else(|| Error::not_found("event not found"))?;

    let start = new_start.unwrap_or(existing.start);
    let end = new_end.unwrap_or(existing.end);
    let user_id = match new_user_name {
        Some(name) => {
            let user_id = require(tables.user_id_by_name(name), "user", name)?;
            if !tables.is_team_member(existing.team_id, user_id) {
                return Err(Error::bad_request(format!(
                    "user '{name}' must be a member of the team"
                )));
            }
            user_id
        }
        None => existing.user_id,
    };
    check_no_overlap(tables, existing.team_id, existing.role_id, start, end, Some(event_id))?;

    let event = tables.events.get_mut(&event_id).expect("checked above");
    event.start = start;
    event.end = end;
    event.user_id = user_id;
    // A single-event edit always breaks linkage, even if nothing else
    // about the event changed.
    event.link_id = None;

    sink::record(
        tables,
        existing.team_id,
        principal,
        "event_edited",
        "event_edited",
        &[existing.role_id],
        &[existing.user_id, user_id],
        start,
        serde_json::json!({"event_id": event_id}),
    );
    Ok(())
}

pub fn delete_event(tables: &mut Tables, principal: &Principal, event_id: EventId) -> Result<()> {
    let existing = tables
        .events
        .remove(&event_id)
        .ok_or_else(|| Error::not_found("event not found"))?;

    sink::record(
        tables,
        existing.team_id,
        principal,
        "event_deleted",
        "event_deleted",
        &[existing.role_id],
        &[existing.user_id],
        existing.start,
        serde_json::json!({"event_id": event_id}),
    );
    Ok(())
}

/// Edit every event sharing `link_id`:
/// the provided fields are applied uniformly to each member, which then
/// dissolves into a standalone event (its `link_id` is cleared). Caller
/// is responsible for the admin-auth and past-edit checks this endpoint
/// requires before calling in.
#[allow(clippy::too_many_arguments)]
pub fn edit_linked_events(
    tables: &mut Tables,
    principal: &Principal,
    link_id: &str,
    new_start: Option<i64>,
    new_end: Option<i64>,
    new_user_name: Option<&str>,
    new_role_name: Option<&str>,
    new_note: Option<String>,
) -> Result<Vec<EventId>> {
    let ids = tables.events_for_link(link_id);
    if ids.is_empty() {
        return Err(Error::not_found("linked group not found"));
    }
    let existing: Vec<Event> = ids.iter().map(|id| tables.events[id].clone()).collect();
    let team_id = existing[0].team_id;

    let user_id = match new_user_name {
        Some(name) => require(tables.user_id_by_name(name), "user", name)?,
        None => existing[0].user_id,
    };
    let role_id = match new_role_name {
        Some(name) => require(tables.role_id_by_name(name), "role", name)?,
        None => existing[0].role_id,
    };
    let note = new_note.or_else(|| existing[0].note.clone());

    for e in &existing {
        let start = new_start.unwrap_or(e.start);
        let end = new_end.unwrap_or(e.end);
        check_no_overlap(tables, team_id, role_id, start, end, Some(e.id))?;
    }
    for e in &existing {
        let start = new_start.unwrap_or(e.start);
        let end = new_end.unwrap_or(e.end);
        let ev = tables.events.get_mut(&e.id).expect("checked above");
        ev.start = start;
        ev.end = end;
        ev.user_id = user_id;
        ev.role_id = role_id;
        ev.note = note.clone();
        ev.link_id = None;
    }

    let user_ids: Vec<UserId> = existing.iter().map(|e| e.user_id).chain([user_id]).collect();
    let earliest_start = existing.iter().map(|e| e.start).min().unwrap_or_else(time::now);
    sink::record(
        tables,
        team_id,
        principal,
        "event_edited",
        "event_edited",
        &[existing[0].role_id, role_id],
        &user_ids,
        earliest_start,
        serde_json::json!({"link_id": link_id, "event_ids": ids}),
    );
    Ok(ids)
}

/// Delete every event sharing `link_id`.
pub fn delete_linked_events(tables: &mut Tables, principal: &Principal, link_id: &str) -> Result<()> {
    let ids = tables.events_for_link(link_id);
    if ids.is_empty() {
        return Err(Error::not_found("linked group not found"));
    }
    let team_id = tables.events[&ids[0]].team_id;
    let role_id = tables.events[&ids[0]].role_id;
    let user_ids: Vec<UserId> = ids.iter().map(|id| tables.events[id].user_id).collect();
    let earliest_start = ids.iter().map(|id| tables.events[id].start).min().unwrap_or(0);

    for id in &ids {
        tables.events.remove(id);
    }

    sink::record(
        tables,
        team_id,
        principal,
        "event_deleted",
        "event_deleted",
        &[role_id],
        &user_ids,
        earliest_start,
        serde_json::json!({"link_id": link_id, "event_ids": ids}),
    );
    Ok(())
}
