use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::catalog::CatalogRepository;
use crate::extract::ApiJson;

use super::advisor::{AdvisorError, AdvisorRequest, AdvisorService, AiRequest};
use super::client::TextGenerator;

/// Router builder exposing the passthrough and advisor endpoints.
pub fn advisor_router<R, G>(service: Arc<AdvisorService<R, G>>) -> Router
where
    R: CatalogRepository + 'static,
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/api/ai", post(ask_handler::<R, G>))
        .route("/api/advisor/recommend", post(recommend_handler::<R, G>))
        .with_state(service)
}

fn error_response(err: AdvisorError) -> Response {
    match err {
        AdvisorError::Catalog(err) => crate::catalog::router::error_response(err),
        AdvisorError::NoCandidates => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        AdvisorError::Generator(ref cause) => {
            error!(%cause, "text generation failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn ask_handler<R, G>(
    State(service): State<Arc<AdvisorService<R, G>>>,
    ApiJson(request): ApiJson<AiRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
    G: TextGenerator + 'static,
{
    match service.ask(request).await {
        Ok(text) => (StatusCode::OK, Json(text)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recommend_handler<R, G>(
    State(service): State<Arc<AdvisorService<R, G>>>,
    ApiJson(profile): ApiJson<AdvisorRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
    G: TextGenerator + 'static,
{
    match service.recommend(profile).await {
        Ok(recommendation) => (StatusCode::OK, Json(recommendation)).into_response(),
        Err(err) => error_response(err),
    }
}
