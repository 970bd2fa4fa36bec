use crate::config::Config;
use crate::duplicates::detect_duplicates;
use crate::errors::AppError;
use crate::models::*;
use crate::pipeline;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
}

/// Builds the application router.
///
/// `/health` is always exempt from rate limiting. Pass `rate_limit = false`
/// when requests carry no peer address (in-process tests).
///
/// # Errors
///
/// Fails if the configured rate limit cannot be turned into a limiter.
pub fn build_router(state: Arc<AppState>, rate_limit: bool) -> anyhow::Result<Router> {
    let mut api_routes: Router<Arc<AppState>> = Router::new()
        .route("/api/v1/leads/score", post(score_leads))
        .route("/api/v1/leads/validate", post(validate_leads))
        .route("/api/v1/leads/duplicates", post(find_duplicate_leads))
        .route("/api/v1/leads/sample", get(sample_leads));

    let body_limit = RequestBodyLimitLayer::new(state.config.max_body_bytes);

    if rate_limit {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_millisecond(state.config.rate_limit_interval_ms())
                .burst_size(state.config.rate_limit_burst)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("Invalid rate limit configuration"))?,
        );

        api_routes = api_routes.layer(
            ServiceBuilder::new()
                .layer(body_limit)
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );
    } else {
        api_routes = api_routes.layer(body_limit);
    }

    Ok(Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lead-enhancer-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/leads/score
///
/// Validates and scores every lead, returning them best-first with a
/// per-tier summary.
///
/// # Errors
///
/// * `400` - Malformed JSON or an empty `leads` list.
pub async fn score_leads(
    payload: Result<Json<LeadsRequest>, JsonRejection>,
) -> Result<Json<ScoreLeadsResponse>, AppError> {
    let Json(request) = payload?;

    if request.leads.is_empty() {
        return Err(AppError::BadRequest("No leads provided".to_string()));
    }

    tracing::info!("POST /leads/score - {} lead(s)", request.leads.len());
    let result = pipeline::score_batch(&request.leads);

    Ok(Json(ScoreLeadsResponse {
        success: true,
        leads: result.leads,
        summary: result.summary,
        generated_at: chrono::Utc::now(),
    }))
}

/// POST /api/v1/leads/validate
///
/// Normalizes and quality-flags every lead, in input order.
pub async fn validate_leads(
    payload: Result<Json<LeadsRequest>, JsonRejection>,
) -> Result<Json<ValidateLeadsResponse>, AppError> {
    let Json(request) = payload?;

    tracing::info!("POST /leads/validate - {} lead(s)", request.leads.len());
    let leads = pipeline::validate_batch(&request.leads);

    Ok(Json(ValidateLeadsResponse {
        success: true,
        leads,
    }))
}

/// POST /api/v1/leads/duplicates
///
/// Groups leads with similar company names. The request may override the
/// configured similarity threshold.
///
/// # Errors
///
/// * `400` - Malformed JSON or a threshold outside `[0, 1]`.
pub async fn find_duplicate_leads(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DuplicatesRequest>, JsonRejection>,
) -> Result<Json<DuplicatesResponse>, AppError> {
    let Json(request) = payload?;

    let threshold = request
        .threshold
        .unwrap_or(state.config.duplicate_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AppError::BadRequest(
            "threshold must be between 0 and 1".to_string(),
        ));
    }

    tracing::info!(
        "POST /leads/duplicates - {} lead(s), threshold {}",
        request.leads.len(),
        threshold
    );
    let duplicates = detect_duplicates(&request.leads, threshold);

    Ok(Json(DuplicatesResponse {
        success: true,
        threshold,
        duplicates,
    }))
}

/// GET /api/v1/leads/sample
///
/// Returns the built-in demo leads.
pub async fn sample_leads() -> Json<SampleLeadsResponse> {
    Json(SampleLeadsResponse {
        leads: pipeline::sample_leads(),
    })
}
