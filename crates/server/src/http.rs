//! HTTP Endpoints
//!
//! REST API for the dashboard.

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Json, Query, State},
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use prompt_dashboard_config::DEFAULT_CORS_ORIGIN;
use prompt_dashboard_core::{DatasetSchema, DatasetType, Interpretation};
use prompt_dashboard_data::{DataQuery, QueryParams, Record};

use crate::metrics::{metrics_handler, record_data_query, track_requests};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    // Release the config lock before building the router
    let (cors_layer, timeout) = {
        let config = state.config.read();
        (
            build_cors_layer(&config.server.cors_origins, config.server.cors_enabled),
            Duration::from_secs(config.server.timeout_seconds),
        )
    };

    Router::new()
        .route("/api/interpret", post(interpret))
        .route("/api/data", get(get_data))
        .route("/api/summary", get(get_summary))
        .route("/api/schema", get(get_schema))
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        // Admin endpoints
        .route("/admin/reload-config", post(reload_config))
        .route_layer(middleware::from_fn(track_requests))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, allows only `DEFAULT_CORS_ORIGIN`
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let localhost = || {
        CorsLayer::new()
            .allow_origin(HeaderValue::from_static(DEFAULT_CORS_ORIGIN))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to {}", DEFAULT_CORS_ORIGIN);
        return localhost();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        return localhost();
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Interpret a prompt into one component per requested dataset.
///
/// The body must be a JSON object with a non-empty string `prompt`.
async fn interpret(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Interpretation>>, ServerError> {
    let prompt = body
        .ok()
        .and_then(|Json(body)| body.get("prompt").and_then(Value::as_str).map(str::to_owned))
        .filter(|prompt| !prompt.is_empty())
        .ok_or_else(|| ServerError::InvalidRequest("Invalid prompt".to_string()))?;

    let interpreter = state.interpreter();
    let interpretations = interpreter.interpret_all(&prompt).await;

    tracing::info!(
        interpreter = interpreter.name(),
        components = interpretations.len(),
        "Interpreted prompt"
    );
    Ok(Json(interpretations))
}

/// Records of one dataset with optional filters, sort and limit
async fn get_data(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Record>>, ServerError> {
    let query = DataQuery::from_params(&params)?;

    let latency = state.get_config().data.simulated_latency_ms;
    if latency > 0 {
        tokio::time::sleep(Duration::from_millis(latency)).await;
    }

    record_data_query(query.dataset);
    Ok(Json(state.engine.execute(&query)))
}

#[derive(Debug, Deserialize)]
struct SummaryParams {
    #[serde(rename = "type")]
    dataset: Option<String>,
}

/// Summary statistics for card components
async fn get_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<impl IntoResponse, ServerError> {
    let dataset: DatasetType = params
        .dataset
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid data type".to_string()))?;

    Ok(Json(state.engine.summary(dataset)?))
}

async fn get_schema() -> Json<Vec<DatasetSchema>> {
    Json(DatasetSchema::all())
}

/// Liveness with dataset sizes
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut datasets = serde_json::Map::new();
    let mut all_healthy = true;

    for dataset in DatasetType::ALL {
        let count = state.engine.store().len(dataset);
        if count == 0 {
            all_healthy = false;
        }
        datasets.insert(
            dataset.as_str().to_string(),
            serde_json::json!({
                "status": if count > 0 { "ok" } else { "empty" },
                "count": count
            }),
        );
    }

    let interpreter = state.interpreter().name().to_string();
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if all_healthy { "healthy" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "interpreter": interpreter,
            "checks": { "datasets": datasets }
        })),
    )
}

/// Readiness: the hosted service must answer when it is enabled. The
/// rule-based interpreter is always ready.
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let hosted = state.hosted();

    let (ready, hosted_status) = if !hosted.is_enabled() {
        (true, "disabled")
    } else {
        match tokio::time::timeout(Duration::from_secs(2), hosted.is_available()).await {
            Ok(true) => (true, "ok"),
            Ok(false) => (false, "unreachable"),
            Err(_) => (false, "timeout"),
        }
    };

    let model = hosted.backend().map(|b| b.model_name().to_string());
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "checks": {
                "hosted_interpreter": {
                    "status": hosted_status,
                    "model": model
                }
            }
        })),
    )
}

async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.reload_config() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "message": "Configuration reloaded successfully"
            })),
        ),
        Err(e) => {
            tracing::error!("Config reload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "message": e.to_string()
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_creation() {
        let state = AppState::from_settings(Default::default()).unwrap();
        let _ = create_router(state);
    }

    #[test]
    fn test_cors_origins() {
        let _ = build_cors_layer(&[], true);
        let _ = build_cors_layer(&["http://example.com".to_string()], true);
        let _ = build_cors_layer(&["bad\norigin".to_string()], true);
        let _ = build_cors_layer(&[], false);
    }
}
