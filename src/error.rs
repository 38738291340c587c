use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::chat::ValidationError;
use crate::gateway::GatewayError;

pub const CONFIGURATION_ERROR_MESSAGE: &str = "The AI model is not configured on this server.";
pub const GATEWAY_ERROR_MESSAGE: &str = "Sorry, I couldn't get an answer from the AI model.";
pub const STORAGE_ERROR_MESSAGE: &str = "Failed to access conversation history.";

/// Errors surfaced by the HTTP routes.
///
/// Only validation messages reach the client verbatim; everything else is
/// logged here and replaced with a fixed message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("model gateway is not configured")]
    Configuration,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("history storage failed: {0}")]
    Storage(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration | ApiError::Gateway(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(err) => err.to_string(),
            ApiError::Configuration => CONFIGURATION_ERROR_MESSAGE.to_string(),
            ApiError::Gateway(_) => GATEWAY_ERROR_MESSAGE.to_string(),
            ApiError::Storage(_) => STORAGE_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(err) => debug!("Rejected request: {}", err),
            ApiError::Configuration => error!("Chat request received but no model gateway is configured"),
            ApiError::Gateway(err) => warn!("Model gateway failed ({}): {}", err.kind(), err),
            ApiError::Storage(err) => error!("History storage failed: {:#}", err),
        }

        (self.status_code(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}
