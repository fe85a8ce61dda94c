use axum::{
    routing::{any, get, MethodRouter},
    Router,
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers::{check_auth_handler, get_data_handler, health_handler, hello_world_handler};
use crate::routes;
use crate::state::AppState;

/// Give one function its own pool of `max_instances` concurrent requests
///
/// Requests past the cap wait for a permit instead of being rejected.
fn function(route: MethodRouter<AppState>, max_instances: usize) -> MethodRouter<AppState> {
    route.layer(GlobalConcurrencyLimitLayer::new(max_instances))
}

/// Build the application router with every function mounted
pub fn build_router(state: AppState) -> Router {
    let max_instances = state.config.max_instances;

    Router::new()
        .route(routes::HELLO_WORLD, function(any(hello_world_handler), max_instances))
        .route(routes::GET_DATA, function(any(get_data_handler), max_instances))
        .route(routes::CHECK_AUTH, function(any(check_auth_handler), max_instances))
        .route(routes::HEALTH, get(health_handler))
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
