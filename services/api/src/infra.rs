use axum::http::HeaderValue;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};
use uni_directory::ai::{AdvisorService, OpenAiCompatibleClient};
use uni_directory::catalog::{CatalogService, SqliteCatalogRepository};
use uni_directory::config::AppConfig;
use uni_directory::error::AppError;

pub(crate) type Catalog = CatalogService<SqliteCatalogRepository>;
pub(crate) type Advisor = AdvisorService<SqliteCatalogRepository, OpenAiCompatibleClient>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_catalog(config: &AppConfig) -> Result<Arc<Catalog>, AppError> {
    let repository = SqliteCatalogRepository::open(&config.database.path)?;
    info!(path = %config.database.path.display(), "catalog database opened");
    Ok(Arc::new(CatalogService::new(Arc::new(repository))))
}

pub(crate) fn build_advisor(
    config: &AppConfig,
    catalog: Arc<Catalog>,
) -> Result<Arc<Advisor>, AppError> {
    if config.ai.api_key.is_none() {
        warn!("API_KEY is not set; text generation requests will be sent unauthenticated");
    }
    let client = OpenAiCompatibleClient::from_config(&config.ai)?;
    info!(model = client.model(), "text generation client configured");
    Ok(Arc::new(AdvisorService::new(catalog, Arc::new(client))))
}

/// Credentialed CORS for the configured browser origins. Origins that are not
/// valid header values are skipped.
pub(crate) fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
