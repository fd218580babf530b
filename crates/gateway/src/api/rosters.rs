use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use oncall_domain::Error;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::ingress_auth::authenticate;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateRosterRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct RosterResponse {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
}

pub async fn create_roster(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team): Path<String>,
    Json(body): Json<CreateRosterRequest>,
) -> ApiResult<Json<RosterResponse>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
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
    oncall_auth::check_team_admin(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    let roster = state
        .store
        .transact(move |t| {
            let id = t.insert_roster(team_id, &body.name)?;
            Ok(t.rosters[&id].clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(RosterResponse {
        id: roster.id,
        team_id: roster.team_id,
        name: roster.name,
    }))
}

#[derive(Deserialize)]
pub struct SetRosterUserRequest {
    pub user: String,
    pub in_rotation: bool,
    pub roster_priority: i32,
}

pub async fn set_roster_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(roster): Path<i64>,
    Json(body): Json<SetRosterUserRequest>,
) -> ApiResult<()> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "PUT",
        "/api/v0/rosters",
        &[],
    )
    .await?;

    let team_id = state
        .store
        .read(move |t| t.rosters.get(&roster).map(|r| r.team_id))
        .await
        .ok_or_else(|| Error::not_found("roster not found"))?;
    oncall_auth::check_team_admin(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    let user_name = body.user.clone();
    state
        .store
        .transact(move |t| {
            let user_id = oncall_store::require(t.user_id_by_name(&user_name), "user", &user_name)?;
            t.set_roster_user(roster, user_id, body.in_rotation, body.roster_priority);
            Ok(())
        })
        .await
        .map_err(ApiError)?;
    Ok(())
}
