use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use oncall_domain::Error;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::ingress_auth::authenticate;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default = "default_tz")]
    pub scheduling_timezone: String,
}

fn default_tz() -> String {
    "UTC".to_string()
}

#[derive(Serialize)]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub scheduling_timezone: String,
}

pub async fn create_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateTeamRequest>,
) -> ApiResult<Json<TeamResponse>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
        "/api/v0/teams",
        &[],
    )
    .await?;

    let name = body.name.clone();
    let team = state
        .store
        .transact(move |t| {
            let id = t.insert_team(&name, &body.scheduling_timezone)?;
            if let Some(uid) = principal.user_id() {
                t.add_team_admin(id, uid);
            }
            Ok(t.teams[&id].clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(TeamResponse {
        id: team.id,
        name: team.name,
        active: team.active,
        scheduling_timezone: team.scheduling_timezone,
    }))
}

pub async fn get_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team): Path<String>,
) -> ApiResult<Json<TeamResponse>> {
    let team_clone = team.clone();
    let found = state
        .store
        .read(move |t| t.team_id_by_name(&team_clone).map(|id| t.teams[&id].clone()))
        .await
        .ok_or_else(|| Error::not_found(format!("team '{team}' not found")))?;

    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/teams",
        &[],
    )
    .await?;
    oncall_auth::check_team_auth(&state.store, &principal, found.id)
        .await
        .map_err(ApiError)?;

    Ok(Json(TeamResponse {
        id: found.id,
        name: found.name,
        active: found.active,
        scheduling_timezone: found.scheduling_timezone,
    }))
}

pub async fn delete_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team): Path<String>,
) -> ApiResult<()> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "DELETE",
        "/api/v0/teams",
        &[],
    )
    .await?;

    let team_id = state
        .store
        .read({
            let team = team.clone();
            move |t| t.team_id_by_name(&team)
        })
        .await
        .ok_or_else(|| Error::not_found(format!("team '{team}' not found")))?;
    oncall_auth::check_team_admin(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    state
        .store
        .transact(move |t| t.soft_delete_team(team_id))
        .await
        .map_err(ApiError)?;
    Ok(())
}
