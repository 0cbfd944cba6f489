use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use uni_directory::ai::{advisor_router, AdvisorService, TextGenerator};
use uni_directory::catalog::{catalog_router, CatalogRepository, CatalogService};

pub(crate) fn with_directory_routes<R, G>(
    catalog: Arc<CatalogService<R>>,
    advisor: Arc<AdvisorService<R, G>>,
) -> Router
where
    R: CatalogRepository + 'static,
    G: TextGenerator + 'static,
{
    catalog_router(catalog)
        .merge(advisor_router(advisor))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::cors_layer;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;
    use uni_directory::ai::AiError;
    use uni_directory::catalog::SqliteCatalogRepository;

    struct CannedGenerator;

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
            Ok("canned reply".to_string())
        }
    }

    fn test_app(ready: bool) -> (Router, Arc<AtomicBool>) {
        let repository =
            Arc::new(SqliteCatalogRepository::in_memory().expect("in-memory store"));
        let catalog = Arc::new(CatalogService::new(repository));
        let advisor = Arc::new(AdvisorService::new(
            catalog.clone(),
            Arc::new(CannedGenerator),
        ));

        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };

        let app = with_directory_routes(catalog, advisor)
            .layer(Extension(state))
            .layer(cors_layer(&["http://localhost:5173".to_string()]));
        (app, readiness)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (app, _) = test_app(false);

        let response = app.oneshot(get_request("/health")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let (app, readiness) = test_app(false);

        let response = app
            .clone()
            .oneshot(get_request("/ready"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        readiness.store(true, Ordering::Release);
        let response = app.oneshot(get_request("/ready")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let (app, _) = test_app(true);

        let response = app.oneshot(get_request("/metrics")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn catalog_and_advisor_routes_are_mounted() {
        let (app, _) = test_app(true);

        let response = app
            .clone()
            .oneshot(get_request("/api"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));

        let ask = Request::builder()
            .method(Method::POST)
            .uri("/api/ai")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"template": "Answer:", "text": "hi"}"#))
            .expect("request");
        let response = app.oneshot(ask).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!("canned reply"));
    }

    #[tokio::test]
    async fn cors_allows_configured_origins_only() {
        let (app, _) = test_app(true);

        let allowed = Request::builder()
            .uri("/api")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .expect("request");
        let response = app.clone().oneshot(allowed).await.expect("response");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );

        let foreign = Request::builder()
            .uri("/api")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(foreign).await.expect("response");
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
