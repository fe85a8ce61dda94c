use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{DataResponse, HealthResponse, MessageResponse, UnhealthyResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "cloud-functions-starter API",
        version = "1.0.0",
        description = "Starter HTTP functions: a greeting, a collection read and an auth header stub"
    ),
    paths(
        handlers::hello::hello_world_handler,
        handlers::data::get_data_handler,
        handlers::auth::check_auth_handler,
        handlers::health::health_handler
    ),
    components(
        schemas(
            DataResponse,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "functions", description = "HTTP functions, each accepting any method"),
        (name = "health", description = "Health check operations")
    )
)]
pub struct ApiDoc;
