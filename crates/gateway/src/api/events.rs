use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use oncall_domain::model::Event;
use oncall_domain::{time, Error};
use oncall_store::Filter;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::ingress_auth::authenticate;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<Event>>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/events",
        &[],
    )
    .await?;

    // If the caller scoped the query to one team, enforce team
    // membership; an unscoped query just requires any authenticated
    // principal; filtering beyond that happens through the query grammar
    // itself.
    let team_id = pairs
        .iter()
        .find(|(k, _)| k == "team_id" || k == "team")
        .and_then(|(_, v)| v.parse::<i64>().ok());
    if let Some(team_id) = team_id {
        oncall_auth::check_team_auth(&state.store, &principal, team_id)
            .await
            .map_err(ApiError)?;
    }
    let include_subscribed = pairs
        .iter()
        .any(|(k, v)| k == "include_subscribed" && v == "true");

    let clause_pairs: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(k, _)| k != "include_subscribed")
        .collect();
    let filter = Filter::from_pairs(&clause_pairs).map_err(ApiError)?;
    let events = state
        .store
        .read(move |t| {
            let mut matched: Vec<Event> = t.events.values().filter(|e| filter.matches(e)).cloned().collect();
            if include_subscribed {
                if let Some(team_id) = team_id {
                    for sub in t.team_subscriptions.iter().filter(|s| s.team_id == team_id) {
                        matched.extend(
                            t.events
                                .values()
                                .filter(|e| e.team_id == sub.subscription_id && e.role_id == sub.role_id)
                                .cloned(),
                        );
                    }
                }
            }
            matched.sort_by_key(|e| e.start);
            matched
        })
        .await;
    Ok(Json(events))
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub team: String,
    pub role: String,
    pub user: String,
    pub start: i64,
    pub end: i64,
    pub note: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateEventRequest>,
) -> ApiResult<Json<Event>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
        "/api/v0/events",
        &[],
    )
    .await?;

    let team_clone = body.team.clone();
    let team_id = state
        .store
        .read(move |t| t.team_id_by_name(&team_clone))
        .await
        .ok_or_else(|| Error::not_found(format!("team '{}' not found", body.team)))?;
    oncall_auth::check_team_auth(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    if body.start < time::now() - time::GRACE_PERIOD {
        return Err(ApiError(Error::bad_request("event start time cannot be in the past")));
    }

    let event = state
        .store
        .transact(move |t| {
            let id = oncall_engine::create_event(
                t, &principal, &body.team, &body.role, &body.user, body.start, body.end, body.note,
            )?;
            Ok(t.events[&id].clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(event))
}

pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<Event>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/events",
        &[],
    )
    .await?;

    let event = state
        .store
        .read(move |t| t.events.get(&id).cloned())
        .await
        .ok_or_else(|| Error::not_found("event not found"))?;
    oncall_auth::check_team_auth(&state.store, &principal, event.team_id)
        .await
        .map_err(ApiError)?;

    Ok(Json(event))
}

#[derive(Deserialize)]
pub struct EditEventRequest {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub user: Option<String>,
}

pub async fn edit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<EditEventRequest>,
) -> ApiResult<Json<Event>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "PUT",
        "/api/v0/events",
        &[],
    )
    .await?;

    let existing = state
        .store
        .read(move |t| t.events.get(&id).cloned())
        .await
        .ok_or_else(|| Error::not_found("event not found"))?;

    let now = time::now();
    let past_start = existing.start < now - time::GRACE_PERIOD;
    let new_start_past = body.start.map(|s| s < now - time::GRACE_PERIOD).unwrap_or(false);
    let only_extends_end = body.start.is_none() && body.user.is_none() && body.end.map(|e| e > existing.end).unwrap_or(false);
    if (past_start || new_start_past) && !only_extends_end {
        oncall_auth::check_team_auth(&state.store, &principal, existing.team_id)
            .await
            .map_err(|_| ApiError(Error::bad_request("cannot edit a past event without team authorization")))?;
    } else {
        oncall_auth::check_team_auth(&state.store, &principal, existing.team_id)
            .await
            .map_err(ApiError)?;
    }

    let event = state
        .store
        .transact(move |t| {
            oncall_engine::edit_event(t, &principal, id, body.start, body.end, body.user.as_deref())?;
            Ok(t.events[&id].clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(event))
}

pub async fn delete_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "DELETE",
        "/api/v0/events",
        &[],
    )
    .await?;

    let existing = state
        .store
        .read(move |t| t.events.get(&id).cloned())
        .await
        .ok_or_else(|| Error::not_found("event not found"))?;
    if existing.start < time::now() - time::GRACE_PERIOD {
        return Err(ApiError(Error::bad_request("cannot delete an event that has already started")));
    }
    oncall_auth::check_team_auth(&state.store, &principal, existing.team_id)
        .await
        .map_err(ApiError)?;

    state
        .store
        .transact(move |t| oncall_engine::delete_event(t, &principal, id))
        .await
        .map_err(ApiError)?;
    Ok(())
}

#[derive(Deserialize)]
pub struct CreateLinkedRequest {
    pub team: String,
    pub role: String,
    pub members: Vec<LinkedMember>,
}

#[derive(Deserialize)]
pub struct LinkedMember {
    pub user: String,
    pub start: i64,
    pub end: i64,
}

pub async fn create_linked(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateLinkedRequest>,
) -> ApiResult<Json<Vec<Event>>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
        "/api/v0/events/link",
        &[],
    )
    .await?;

    let team_clone = body.team.clone();
    let team_id = state
        .store
        .read(move |t| t.team_id_by_name(&team_clone))
        .await
        .ok_or_else(|| Error::not_found(format!("team '{}' not found", body.team)))?;
    oncall_auth::check_team_auth(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    let members: Vec<(String, i64, i64)> =
        body.members.into_iter().map(|m| (m.user, m.start, m.end)).collect();

    let events = state
        .store
        .transact(move |t| {
            let ids = oncall_engine::create_linked_events(t, &principal, &body.team, &body.role, &members)?;
            Ok(ids.iter().map(|id| t.events[id].clone()).collect::<Vec<_>>())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(events))
}

#[derive(Deserialize)]
pub struct EditLinkedRequest {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub user: Option<String>,
    pub role: Option<String>,
    pub note: Option<String>,
}

pub async fn edit_linked(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(link_id): Path<String>,
    Json(body): Json<EditLinkedRequest>,
) -> ApiResult<Json<Vec<Event>>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "PUT",
        "/api/v0/events/link",
        &[],
    )
    .await?;

    let link_clone = link_id.clone();
    let existing = state
        .store
        .read(move |t| {
            let ids = t.events_for_link(&link_clone);
            ids.first().map(|id| t.events[id].team_id)
        })
        .await
        .ok_or_else(|| Error::not_found("linked group not found"))?;
    oncall_auth::check_team_admin(&state.store, &principal, existing)
        .await
        .map_err(ApiError)?;

    let events = state
        .store
        .transact(move |t| {
            let ids = oncall_engine::edit_linked_events(
                t,
                &principal,
                &link_id,
                body.start,
                body.end,
                body.user.as_deref(),
                body.role.as_deref(),
                body.note,
            )?;
            Ok(ids.iter().map(|id| t.events[id].clone()).collect::<Vec<_>>())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(events))
}

pub async fn delete_linked(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(link_id): Path<String>,
) -> ApiResult<()> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "DELETE",
        "/api/v0/events/link",
        &[],
    )
    .await?;

    let link_clone = link_id.clone();
    let team_id = state
        .store
        .read(move |t| {
            let ids = t.events_for_link(&link_clone);
            ids.first().map(|id| t.events[id].team_id)
        })
        .await
        .ok_or_else(|| Error::not_found("linked group not found"))?;
    oncall_auth::check_team_auth(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    state
        .store
        .transact(move |t| oncall_engine::delete_linked_events(t, &principal, &link_id))
        .await
        .map_err(ApiError)?;
    Ok(())
}

#[derive(Deserialize)]
pub struct SwapRequest {
    pub side_0: SwapSideRequest,
    pub side_1: SwapSideRequest,
}

#[derive(Deserialize)]
pub struct SwapSideRequest {
    pub id: String,
    pub linked: bool,
}

pub async fn swap(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SwapRequest>,
) -> ApiResult<()> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
        "/api/v0/events/swap",
        &[],
    )
    .await?;

    let now = time::now();
    state
        .store
        .transact(move |t| {
            oncall_engine::swap_events(
                t,
                &principal,
                oncall_engine::SwapSide { id: body.side_0.id, linked: body.side_0.linked },
                oncall_engine::SwapSide { id: body.side_1.id, linked: body.side_1.linked },
                now,
            )
        })
        .await
        .map_err(ApiError)?;
    Ok(())
}

#[derive(Deserialize)]
pub struct OverrideRequest {
    pub event_ids: Vec<i64>,
    pub start: i64,
    pub end: i64,
    pub user: String,
}

pub async fn override_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<OverrideRequest>,
) -> ApiResult<Json<Event>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
        "/api/v0/events/override",
        &[],
    )
    .await?;

    let now = time::now();
    let event = state
        .store
        .transact(move |t| {
            let id = oncall_engine::override_events(t, &principal, &body.event_ids, body.start, body.end, &body.user, now)?;
            Ok(t.events[&id].clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(event))
}
