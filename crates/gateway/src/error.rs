//! Translates `oncall_domain::Error` to HTTP once at the ingress
//! boundary, keeping the plain, reusable `oncall_domain::Error` type
//! separate from its `IntoResponse` impl.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use oncall_domain::ErrorKind;
use serde_json::json;

pub struct ApiError(pub oncall_domain::Error);

impl From<oncall_domain::Error> for ApiError {
    fn from(e: oncall_domain::Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::UpstreamFailure => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
