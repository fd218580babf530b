use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use oncall_domain::model::{AuditLogEntry, ContactMode, NotificationSetting};
use oncall_domain::Error;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::ingress_auth::authenticate;
use crate::state::AppState;

pub async fn list_user_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user): Path<String>,
) -> ApiResult<Json<Vec<NotificationSetting>>> {
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

    let settings = state
        .store
        .read(move |t| {
            t.notification_settings
                .values()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;
    Ok(Json(settings))
}

#[derive(Deserialize)]
pub struct CreateSettingRequest {
    pub team: String,
    pub mode: ContactMode,
    pub type_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub time_before: Option<i64>,
    #[serde(default)]
    pub only_if_involved: Option<bool>,
}

pub async fn create_setting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user): Path<String>,
    Json(body): Json<CreateSettingRequest>,
) -> ApiResult<Json<NotificationSetting>> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
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

    let setting = state
        .store
        .transact(move |t| {
            let team_id = oncall_store::require(t.team_id_by_name(&body.team), "team", &body.team)?;
            let role_ids = body
                .roles
                .iter()
                .map(|r| oncall_store::require(t.role_id_by_name(r), "role", r))
                .collect::<oncall_domain::Result<Vec<_>>>()?;
            oncall_store::require(t.notification_types.get(&body.type_name).cloned(), "notification type", &body.type_name)?;
            let id = t.insert_notification_setting(
                user_id,
                team_id,
                body.mode,
                &body.type_name,
                role_ids,
                body.time_before,
                body.only_if_involved,
            );
            Ok(t.notification_settings[&id].clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(setting))
}

pub async fn delete_setting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((user, id)): Path<(String, i64)>,
) -> ApiResult<()> {
    let principal = authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "DELETE",
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

    state
        .store
        .transact(move |t| {
            let setting = t
                .notification_settings
                .get(&id)
                .ok_or_else(|| Error::not_found("notification setting not found"))?;
            if setting.user_id != user_id {
                return Err(Error::not_found("notification setting not found"));
            }
            t.delete_notification_setting(id);
            Ok(())
        })
        .await
        .map_err(ApiError)?;
    Ok(())
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub team: Option<String>,
    pub owner: Option<String>,
    pub action: Option<String>,
}

/// "Search notifications" resolves to a search over the audit trail —
/// `NotificationSetting` CRUD lives under `/api/v0/users/{u}/notifications`.
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<AuditLogEntry>>> {
    authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/notifications",
        &[],
    )
    .await?;

    let entries = state
        .store
        .read(move |t| {
            t.audit_log
                .iter()
                .filter(|e| query.team.as_deref().map_or(true, |v| e.team_name == v))
                .filter(|e| query.owner.as_deref().map_or(true, |v| e.owner_name == v))
                .filter(|e| query.action.as_deref().map_or(true, |v| e.action_name == v))
                .cloned()
                .collect::<Vec<_>>()
        })
        .await;
    Ok(Json(entries))
}
