use axum::{
    Router,
    http::{Method, Uri},
    routing::get,
};

use crate::{AppState, error::ApiError, routes};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::todos::router())
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Route {} {} not found", method, uri.path()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::test_support::test_app;

    #[tokio::test]
    async fn health_reports_ok_with_database_probe() {
        let (_db, app) = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["services"]["database"], "ok");
    }

    #[tokio::test]
    async fn unmatched_route_gets_the_error_envelope() {
        let (_db, app) = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope/nothing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Route GET /nope/nothing not found");
        assert_eq!(json["error"]["details"], serde_json::json!({}));
    }
}
