use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use oncall_domain::model::{ContactMode, IcalPrincipalType};
use oncall_domain::Error;
use oncall_ical::{render_calendar, CalendarEvent};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::ingress_auth::authenticate;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct IcalQuery {
    #[serde(default)]
    pub contact: bool,
    #[serde(default)]
    pub include_subscribed: bool,
}

fn calendar_response(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn team_ical(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team): Path<String>,
    Query(query): Query<IcalQuery>,
) -> ApiResult<Response> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/teams",
        &[],
    )
    .await?;

    let team_clone = team.clone();
    let team_id = state
        .store
        .read(move |t| t.team_id_by_name(&team_clone))
        .await
        .ok_or_else(|| Error::not_found(format!("team '{team}' not found")))?;
    oncall_auth::check_team_auth(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    let body = state
        .store
        .read(move |t| {
            let mut ids = t.events_in_range(team_id, None, i64::MIN, i64::MAX);
            if query.include_subscribed {
                for sub in t.team_subscriptions.iter().filter(|s| s.team_id == team_id) {
                    ids.extend(t.events_in_range(sub.subscription_id, Some(sub.role_id), i64::MIN, i64::MAX));
                }
            }
            let team_name = t.teams[&team_id].name.clone();
            let cal_events: Vec<CalendarEvent> = ids
                .into_iter()
                .map(|id| {
                    let e = &t.events[&id];
                    calendar_event(t, e, query.contact)
                })
                .collect();
            render_calendar(&team_name, &cal_events, query.contact)
        })
        .await;

    Ok(calendar_response(body))
}

pub async fn user_ical(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user): Path<String>,
    Query(query): Query<IcalQuery>,
) -> ApiResult<Response> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/users",
        &[],
    )
    .await?;

    let user_clone = user.clone();
    let user_id = state
        .store
        .read(move |t| t.user_id_by_name(&user_clone))
        .await
        .ok_or_else(|| Error::not_found(format!("user '{user}' not found")))?;
    oncall_auth::check_user_auth(&state.store, &principal, user_id)
        .await
        .map_err(ApiError)?;

    let body = state
        .store
        .read(move |t| {
            let events = t.events_for_user(user_id, i64::MIN, i64::MAX);
            let full_name = t.users[&user_id].full_name.clone();
            let cal_events: Vec<CalendarEvent> = events
                .into_iter()
                .map(|id| {
                    let e = &t.events[&id];
                    calendar_event(t, e, query.contact)
                })
                .collect();
            render_calendar(&full_name, &cal_events, query.contact)
        })
        .await;

    Ok(calendar_response(body))
}

pub async fn public_ical(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    let key_clone = key.clone();
    let record = state
        .store
        .read(move |t| t.ical_key_record(&key_clone).cloned())
        .await
        .ok_or_else(|| Error::not_found("ical key not found"))?;

    let body = state
        .store
        .read(move |t| match record.principal_type {
            IcalPrincipalType::Team => {
                let team_id = record.principal_id;
                let events = t.events_in_range(team_id, None, i64::MIN, i64::MAX);
                let team_name = t.teams.get(&team_id).map(|tm| tm.name.clone()).unwrap_or_default();
                let cal_events: Vec<CalendarEvent> = events
                    .into_iter()
                    .map(|id| calendar_event(t, &t.events[&id], false))
                    .collect();
                render_calendar(&team_name, &cal_events, false)
            }
            IcalPrincipalType::User => {
                let user_id = record.principal_id;
                let events = t.events_for_user(user_id, i64::MIN, i64::MAX);
                let full_name = t.users.get(&user_id).map(|u| u.full_name.clone()).unwrap_or_default();
                let cal_events: Vec<CalendarEvent> = events
                    .into_iter()
                    .map(|id| calendar_event(t, &t.events[&id], false))
                    .collect();
                render_calendar(&full_name, &cal_events, false)
            }
        })
        .await;

    Ok(calendar_response(body))
}

fn calendar_event(t: &oncall_store::Tables, e: &oncall_domain::model::Event, contact: bool) -> CalendarEvent {
    let user = &t.users[&e.user_id];
    let team_name = t.teams.get(&e.team_id).map(|tm| tm.name.clone()).unwrap_or_default();
    let role_name = t.roles.get(&e.role_id).map(|r| r.name.clone()).unwrap_or_default();
    let email = t
        .user_contacts
        .iter()
        .find(|c| c.user_id == e.user_id && c.mode == ContactMode::Email)
        .map(|c| c.destination.clone());
    let contacts = if contact {
        t.user_contacts
            .iter()
            .filter(|c| c.user_id == e.user_id)
            .map(|c| (c.mode.as_str().to_string(), c.destination.clone()))
            .collect()
    } else {
        Vec::new()
    };
    CalendarEvent {
        event_id: e.id,
        team_name,
        role_name,
        full_name: user.full_name.clone(),
        email,
        start: e.start,
        end: e.end,
        contacts,
    }
}
