use crate::error::{ApiError, ErrorResponse};
use crate::models::DataResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// getData function - read the whole configured collection
///
/// One read of the collection, no pagination or filtering. Any store
/// failure becomes a 500 carrying the error message.
#[utoipa::path(
    method(get, post),
    path = routes::GET_DATA,
    responses(
        (status = 200, description = "Every document in the collection", body = DataResponse),
        (status = 500, description = "Document store read failed", body = ErrorResponse)
    ),
    tag = "functions"
)]
pub async fn get_data_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DataResponse>), ApiError> {
    let collection = state.config.collection.as_str();

    let data = state
        .store
        .list_documents(collection)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read collection '{}': {:#}", collection, e);
            ApiError::from(e)
        })?;

    Ok((StatusCode::OK, Json(DataResponse { success: true, data })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LogFormat};
    use crate::store::testing::{FailingStore, InMemoryStore};
    use crate::store::DocumentStore;
    use axum::{body::Body, http::Request, routing::any, Router};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            spanner_emulator_host: None,
            spanner_project: "test-project".to_string(),
            spanner_instance: "test-instance".to_string(),
            spanner_database: "test-database".to_string(),
            collection: "sampleCollection".to_string(),
            max_instances: 10,
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
            log_format: LogFormat::Pretty,
        }
    }

    fn setup_test_app(store: Arc<dyn DocumentStore>) -> Router {
        let state = AppState {
            store,
            config: Arc::new(test_config()),
        };

        Router::new()
            .route(routes::GET_DATA, any(get_data_handler))
            .with_state(state)
    }

    async fn call(app: Router) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/getData")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_get_data_returns_collection() {
        let store = Arc::new(InMemoryStore::default());
        store.insert("sampleCollection", "b", json!({ "name": "second", "n": 2 }));
        store.insert("sampleCollection", "a", json!({ "name": "first", "tags": ["x"] }));
        store.insert("otherCollection", "c", json!({ "name": "elsewhere" }));

        let (status, body) = call(setup_test_app(store)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": [
                    { "name": "first", "tags": ["x"] },
                    { "name": "second", "n": 2 }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_get_data_empty_collection() {
        let (status, body) = call(setup_test_app(Arc::new(InMemoryStore::default()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "data": [] }));
    }

    #[tokio::test]
    async fn test_get_data_store_failure() {
        let app = setup_test_app(Arc::new(FailingStore("deadline exceeded")));

        let (status, body) = call(app).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "error": "deadline exceeded" }));
    }

    /// Fails the way the Spanner client does: a driver error under context
    struct WrappedFailureStore;

    #[async_trait::async_trait]
    impl DocumentStore for WrappedFailureStore {
        async fn list_documents(&self, _collection: &str) -> anyhow::Result<Vec<crate::store::Document>> {
            Err(anyhow::Error::new(std::io::Error::other("Table not found: documents"))
                .context("Failed to query documents from Spanner"))
        }

        async fn health_check(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_get_data_reports_underlying_store_error() {
        let (status, body) = call(setup_test_app(Arc::new(WrappedFailureStore))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Table not found: documents" })
        );
    }

    #[tokio::test]
    async fn test_get_data_ignores_method() {
        let app = setup_test_app(Arc::new(InMemoryStore::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/getData")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
