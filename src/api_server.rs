// Axum API Server Module
//
// Purpose: REST endpoints for the vehicle comparison engine
// Comparisons are CPU-bound and synchronous: they run on the blocking pool
// under a caller-level timeout.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::catalog::VariantCatalog;
use crate::comparison::ComparisonService;
use crate::config::ServerConfig;
use crate::criteria::{CriteriaInfo, CriteriaRegistry};
use crate::data::VariantId;
use crate::error::CompareError;
use crate::types::{ComparisonRequest, ComparisonResult};

const AVAILABLE_CACHE_KEY: &str = "available";

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ComparisonService>,
    /// Response cache for the available-variants listing only
    pub cache: Cache<String, serde_json::Value>,
    pub fetch_timeout: Duration,
}

impl AppState {
    /// Load the catalog named in `config` and wire up the service
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading variant catalog from {:?}...", config.catalog_path);
        let catalog = VariantCatalog::load(&config.catalog_path)?;

        let service = ComparisonService::new(CriteriaRegistry::standard(), Arc::new(catalog));
        Ok(Self::from_service(service, config))
    }

    pub fn from_service(service: ComparisonService, config: &ServerConfig) -> Self {
        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.available_cache_ttl)
            .build();

        Self {
            service: Arc::new(service),
            cache,
            fetch_timeout: config.fetch_timeout,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Comparison endpoints
        // Static paths are listed before the parameterised pair route
        .route("/compare", post(compare_full))
        .route("/compare/quick", get(compare_quick))
        .route("/compare/available", get(list_available))
        .route("/compare/criteria", get(list_criteria))
        .route("/compare/:id1/vs/:id2", post(compare_pair))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// POST /compare
/// Body: { "variantIds": [1, 2], "criteria": ["price", "range"], "weights": { "price": 2.0 } }
async fn compare_full(
    State(state): State<AppState>,
    payload: Result<Json<ComparisonRequest>, JsonRejection>,
) -> Result<Json<ComparisonResult>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    tracing::info!("Full comparison of {} variants", request.variant_ids.len());

    let result = run_blocking(&state, move |service| service.compare(&request)).await?;
    Ok(Json(result))
}

/// GET /compare/quick?variantIds=1,2,3
async fn compare_quick(
    State(state): State<AppState>,
    query: Result<Query<QuickCompareQuery>, QueryRejection>,
) -> Result<Json<ComparisonResult>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let raw = query
        .variant_ids
        .ok_or_else(|| AppError::BadRequest("variantIds query parameter is required".to_string()))?;
    let ids = parse_id_list(&raw)?;

    tracing::info!("Quick comparison of {} variants", ids.len());

    let result = run_blocking(&state, move |service| service.quick_compare(&ids)).await?;
    Ok(Json(result))
}

/// POST /compare/:id1/vs/:id2
async fn compare_pair(
    State(state): State<AppState>,
    ids: Result<Path<(VariantId, VariantId)>, PathRejection>,
) -> Result<Json<ComparisonResult>, AppError> {
    let Path((first, second)) = ids.map_err(|e| AppError::BadRequest(e.body_text()))?;

    tracing::info!("Head-to-head comparison {} vs {}", first, second);

    let result = run_blocking(&state, move |service| service.compare_two(first, second)).await?;
    Ok(Json(result))
}

/// GET /compare/available - in-stock variants, cached for the configured TTL
async fn list_available(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(cached) = state.cache.get(AVAILABLE_CACHE_KEY).await {
        tracing::debug!("Cache hit for available variants");
        return Ok(Json(cached));
    }

    let variants = run_blocking(&state, |service| service.list_available()).await?;
    let body = serde_json::to_value(&variants)
        .map_err(|e| AppError::Internal(format!("JSON encode error: {}", e)))?;

    state.cache.insert(AVAILABLE_CACHE_KEY.to_string(), body.clone()).await;

    Ok(Json(body))
}

/// GET /compare/criteria - static registry metadata
async fn list_criteria(State(state): State<AppState>) -> Json<CriteriaInfo> {
    Json(state.service.criteria_info())
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(serde::Deserialize, Debug)]
struct QuickCompareQuery {
    #[serde(rename = "variantIds")]
    variant_ids: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse "1, 2,3" into identifiers; blank entries are skipped
fn parse_id_list(raw: &str) -> Result<Vec<VariantId>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<VariantId>()
                .map_err(|_| AppError::BadRequest(format!("Invalid variant id: '{}'", s)))
        })
        .collect()
}

/// Run a service call on the blocking pool, bounded by the fetch timeout
async fn run_blocking<T, F>(state: &AppState, job: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&ComparisonService) -> Result<T, CompareError> + Send + 'static,
{
    let service = state.service.clone();
    let task = tokio::task::spawn_blocking(move || job(service.as_ref()));

    match tokio::time::timeout(state.fetch_timeout, task).await {
        Err(_) => Err(AppError::Internal(format!(
            "Comparison timed out after {} ms",
            state.fetch_timeout.as_millis()
        ))),
        Ok(Err(e)) => Err(AppError::Internal(format!("Task join error: {}", e))),
        Ok(Ok(result)) => result.map_err(AppError::from),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<CompareError> for AppError {
    fn from(err: CompareError) -> Self {
        if err.is_client_error() {
            AppError::BadRequest(err.to_string())
        } else {
            tracing::error!("Comparison failed: {}", err);
            AppError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
