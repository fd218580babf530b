use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use oncall_domain::model::Event;
use oncall_domain::{time, Error};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::ingress_auth::authenticate;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ServiceOncallQuery {
    pub role: Option<String>,
}

/// Events whose window covers `now` for the given `(team, role)`, the
/// literal answer to "who is on-call right now".
async fn current_oncall(state: &AppState, team_id: i64, role_id: Option<i64>) -> Vec<Event> {
    let now = time::now();
    state
        .store
        .read(move |t| {
            t.events_in_range(team_id, role_id, now, now + 1)
                .into_iter()
                .map(|id| t.events[&id].clone())
                .filter(|e| e.start <= now && e.end > now)
                .collect()
        })
        .await
}

pub async fn team_oncall(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team): Path<String>,
) -> ApiResult<Json<Vec<Event>>> {
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

    Ok(Json(current_oncall(&state, team_id, None).await))
}

pub async fn team_oncall_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((team, role)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Event>>> {
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

    let role_clone = role.clone();
    let role_id = state
        .store
        .read(move |t| t.role_id_by_name(&role_clone))
        .await
        .ok_or_else(|| Error::not_found(format!("role '{role}' not found")))?;

    Ok(Json(current_oncall(&state, team_id, Some(role_id)).await))
}

/// `/api/v0/services/{s}/oncall[?role=]` — services are not a separate
/// entity in this store, so a service name resolves directly to a team
/// name; `role` is a query param here rather than a path segment.
pub async fn service_oncall(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(service): Path<String>,
    Query(query): Query<ServiceOncallQuery>,
) -> ApiResult<Json<Vec<Event>>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/services",
        &[],
    )
    .await?;

    let service_clone = service.clone();
    let team_id = state
        .store
        .read(move |t| t.team_id_by_name(&service_clone))
        .await
        .ok_or_else(|| Error::not_found(format!("service '{service}' not found")))?;
    oncall_auth::check_team_auth(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    let role_id = match &query.role {
        Some(role) => Some(
            state
                .store
                .read({
                    let role = role.clone();
                    move |t| t.role_id_by_name(&role)
                })
                .await
                .ok_or_else(|| Error::not_found(format!("role '{role}' not found")))?,
        ),
        None => None,
    };

    Ok(Json(current_oncall(&state, team_id, role_id).await))
}
