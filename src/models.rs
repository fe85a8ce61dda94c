use serde::{Deserialize, Serialize};

use crate::store::Document;

/// Success envelope carrying the documents of a collection
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DataResponse {
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Document>,
}

/// Envelope carrying a human-readable message
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub success: bool,
    pub status: String,
    pub error: String,
}
