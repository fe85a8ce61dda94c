use crate::routes;
use axum::http::StatusCode;

pub const GREETING: &str = "Hello from Firebase!";

/// helloWorld function - static greeting
///
/// Accepts any method and always answers with the same text body.
#[utoipa::path(
    method(get, post),
    path = routes::HELLO_WORLD,
    responses(
        (status = 200, description = "Fixed greeting", body = String, content_type = "text/plain")
    ),
    tag = "functions"
)]
pub async fn hello_world_handler() -> (StatusCode, &'static str) {
    tracing::info!(structured_data = true, "Hello logs!");
    (StatusCode::OK, GREETING)
}
