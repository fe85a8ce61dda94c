use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::MessageResponse;

pub const NO_AUTH_TOKEN: &str = "No auth token provided";

/// Failure envelope carrying an error message
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Every failure a function can report
///
/// Failures are reduced to a message string here, before any envelope is
/// built, so handlers never inspect error types themselves.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    /// Reading the document store failed
    StoreRead(String),
    /// The request carried no usable `authorization` header
    MissingAuthToken,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::StoreRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingAuthToken => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::StoreRead(error) => (
                status,
                Json(ErrorResponse {
                    success: false,
                    error,
                }),
            )
                .into_response(),
            ApiError::MissingAuthToken => {
                (status, Json(MessageResponse::failed(NO_AUTH_TOKEN))).into_response()
            }
        }
    }
}

/// Store errors surface the message of the error that actually occurred,
/// whatever context was layered on top of it
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StoreRead(err.root_cause().to_string())
    }
}
