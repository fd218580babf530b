use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use oncall_domain::model::{Schedule, ScheduleEvent, SchedulerKind};
use oncall_domain::{time, Error};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::ingress_auth::authenticate;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ScheduleResponse {
    pub id: i64,
    pub team_id: i64,
    pub roster_id: i64,
    pub role_id: i64,
    pub auto_populate_threshold: i64,
    pub advanced_mode: bool,
    pub scheduler: SchedulerKind,
    pub events: Vec<ScheduleEvent>,
    pub schedule_order: Option<Vec<i64>>,
}

impl From<Schedule> for ScheduleResponse {
    fn from(s: Schedule) -> Self {
        Self {
            id: s.id,
            team_id: s.team_id,
            roster_id: s.roster_id,
            role_id: s.role_id,
            auto_populate_threshold: s.auto_populate_threshold,
            advanced_mode: s.advanced_mode,
            scheduler: s.scheduler,
            events: s.events,
            schedule_order: s.schedule_order,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateScheduleRequest {
    pub roster_id: i64,
    pub role: String,
    pub scheduler: SchedulerKind,
    #[serde(default = "default_threshold")]
    pub auto_populate_threshold: i64,
    #[serde(default)]
    pub advanced_mode: bool,
    pub events: Vec<ScheduleEvent>,
    #[serde(default)]
    pub schedule_order: Option<Vec<String>>,
}

fn default_threshold() -> i64 {
    21
}

pub async fn create_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team): Path<String>,
    Json(body): Json<CreateScheduleRequest>,
) -> ApiResult<Json<ScheduleResponse>> {
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

    let schedule = state
        .store
        .transact(move |t| {
            let role_id = oncall_store::require(t.role_id_by_name(&body.role), "role", &body.role)?;
            let id = t.insert_schedule(
                team_id,
                body.roster_id,
                role_id,
                body.scheduler,
                body.auto_populate_threshold,
                body.advanced_mode,
                body.events,
            )?;
            if let Some(names) = body.schedule_order {
                let order = names
                    .iter()
                    .map(|n| oncall_store::require(t.user_id_by_name(n), "user", n))
                    .collect::<oncall_domain::Result<Vec<_>>>()?;
                t.set_schedule_order(id, order)?;
            }
            Ok(t.schedules[&id].clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(schedule.into()))
}

pub async fn list_for_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team): Path<String>,
) -> ApiResult<Json<Vec<ScheduleResponse>>> {
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

    let schedules = state
        .store
        .read(move |t| {
            t.schedules_for_team(team_id)
                .into_iter()
                .map(|id| t.schedules[&id].clone())
                .collect::<Vec<_>>()
        })
        .await;
    Ok(Json(schedules.into_iter().map(ScheduleResponse::from).collect()))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<ScheduleResponse>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/schedules",
        &[],
    )
    .await?;

    let schedule = state
        .store
        .read(move |t| t.schedules.get(&id).cloned())
        .await
        .ok_or_else(|| Error::not_found("schedule not found"))?;
    oncall_auth::check_team_auth(&state.store, &principal, schedule.team_id)
        .await
        .map_err(ApiError)?;

    Ok(Json(schedule.into()))
}

#[derive(Deserialize)]
pub struct UpdateScheduleRequest {
    pub events: Option<Vec<ScheduleEvent>>,
    pub advanced_mode: Option<bool>,
    pub auto_populate_threshold: Option<i64>,
    pub schedule_order: Option<Vec<String>>,
}

pub async fn update_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateScheduleRequest>,
) -> ApiResult<Json<ScheduleResponse>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "PUT",
        "/api/v0/schedules",
        &[],
    )
    .await?;

    let team_id = state
        .store
        .read(move |t| t.schedules.get(&id).map(|s| s.team_id))
        .await
        .ok_or_else(|| Error::not_found("schedule not found"))?;
    oncall_auth::check_team_admin(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    let schedule = state
        .store
        .transact(move |t| {
            if let Some(order_names) = body.schedule_order {
                let order = order_names
                    .iter()
                    .map(|n| oncall_store::require(t.user_id_by_name(n), "user", n))
                    .collect::<oncall_domain::Result<Vec<_>>>()?;
                t.set_schedule_order(id, order)?;
            }
            let s = t.schedules.get_mut(&id).ok_or_else(|| Error::not_found("schedule not found"))?;
            if let Some(events) = body.events {
                s.events = oncall_domain::model::normalize_schedule_events(events);
            }
            if let Some(advanced) = body.advanced_mode {
                s.advanced_mode = advanced;
            }
            if let Some(threshold) = body.auto_populate_threshold {
                s.auto_populate_threshold = threshold;
            }
            Ok(s.clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(schedule.into()))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "DELETE",
        "/api/v0/schedules",
        &[],
    )
    .await?;

    let team_id = state
        .store
        .read(move |t| t.schedules.get(&id).map(|s| s.team_id))
        .await
        .ok_or_else(|| Error::not_found("schedule not found"))?;
    oncall_auth::check_team_admin(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    state.store.transact(move |t| t.delete_schedule(id)).await.map_err(ApiError)?;
    Ok(())
}

pub async fn populate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
        "/api/v0/schedules",
        &[],
    )
    .await?;

    let team_id = state
        .store
        .read(move |t| t.schedules.get(&id).map(|s| s.team_id))
        .await
        .ok_or_else(|| Error::not_found("schedule not found"))?;
    oncall_auth::check_team_admin(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    let now = time::now();
    state
        .store
        .transact(move |t| -> oncall_domain::Result<()> {
            oncall_scheduler::default::schedule_team(t, team_id, &[id], now);
            oncall_scheduler::round_robin::schedule_team(t, team_id, &[id], now);
            Ok(())
        })
        .await
        .map_err(ApiError)?;
    Ok(())
}

pub async fn preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<oncall_domain::model::Event>>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/schedules",
        &[],
    )
    .await?;

    let team_id = state
        .store
        .read(move |t| t.schedules.get(&id).map(|s| s.team_id))
        .await
        .ok_or_else(|| Error::not_found("schedule not found"))?;
    oncall_auth::check_team_auth(&state.store, &principal, team_id)
        .await
        .map_err(ApiError)?;

    let now = time::now();
    let events = oncall_scheduler::preview_schedule(&state.store, team_id, id, now).await;
    Ok(Json(events))
}
