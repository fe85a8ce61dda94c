use crate::error::ApiError;
use crate::models::MessageResponse;
use crate::routes;
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};

pub const TOKEN_RECEIVED: &str = "Auth token received (stub)";

/// checkAuth function - authorization header presence check
///
/// This is a placeholder: the token is never verified, any non-empty
/// `authorization` value is accepted.
#[utoipa::path(
    method(get, post),
    path = routes::CHECK_AUTH,
    params(
        ("authorization" = Option<String>, Header, description = "Bearer token (not verified)")
    ),
    responses(
        (status = 200, description = "Header present", body = MessageResponse),
        (status = 401, description = "Header missing or empty", body = MessageResponse)
    ),
    tag = "functions"
)]
pub async fn check_auth_handler(
    headers: HeaderMap,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let has_token = headers
        .get(AUTHORIZATION)
        .is_some_and(|value| !value.is_empty());

    if !has_token {
        return Err(ApiError::MissingAuthToken);
    }

    Ok((StatusCode::OK, Json(MessageResponse::ok(TOKEN_RECEIVED))))
}
