use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use oncall_domain::model::ContactMode;
use oncall_domain::Error;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::ingress_auth::authenticate;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub full_name: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub active: bool,
}

pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "POST",
        "/api/v0/users",
        &[],
    )
    .await?;

    let user = state
        .store
        .transact(move |t| {
            let id = t.insert_user(&body.name, &body.full_name)?;
            Ok(t.users[&id].clone())
        })
        .await
        .map_err(ApiError)?;

    Ok(Json(UserResponse {
        id: user.id,
        name: user.name,
        full_name: user.full_name,
        active: user.active,
    }))
}

pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    authenticate(
        &state.store,
        state.config.auth.require_auth,
        &headers,
        "GET",
        "/api/v0/users",
        &[],
    )
    .await?;

    let user_clone = user.clone();
    let found = state
        .store
        .read(move |t| t.user_id_by_name(&user_clone).map(|id| t.users[&id].clone()))
        .await
        .ok_or_else(|| Error::not_found(format!("user '{user}' not found")))?;

    Ok(Json(UserResponse {
        id: found.id,
        name: found.name,
        full_name: found.full_name,
        active: found.active,
    }))
}

#[derive(Deserialize)]
pub struct AddContactRequest {
    pub mode: ContactMode,
    pub destination: String,
}

pub async fn add_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user): Path<String>,
    Json(body): Json<AddContactRequest>,
) -> ApiResult<()> {
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

    state
        .store
        .transact(move |t| {
            t.add_contact(user_id, body.mode, &body.destination);
            Ok(())
        })
        .await
        .map_err(ApiError)?;
    Ok(())
}
