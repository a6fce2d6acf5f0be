//! Prompt Dashboard Server
//!
//! HTTP API that turns free-text prompts into dashboard component
//! descriptions and serves the data behind them.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_data_query};
pub use state::{build_lexicon, AppState};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<prompt_dashboard_config::ConfigError> for ServerError {
    fn from(err: prompt_dashboard_config::ConfigError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<prompt_dashboard_data::DataError> for ServerError {
    fn from(err: prompt_dashboard_data::DataError) -> Self {
        match err {
            prompt_dashboard_data::DataError::UnknownDataset(_) => {
                ServerError::InvalidRequest("Invalid data type".to_string())
            }
            other => ServerError::Data(other.to_string()),
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Config(_) | ServerError::Data(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        if !matches!(self, ServerError::InvalidRequest(_)) {
            tracing::error!(error = %message, "Request failed");
        }
        let status = StatusCode::from(self);
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
