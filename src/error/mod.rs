use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::email::{DispatchError, EmailError};
use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Email delivery error: {0}")]
    Email(#[from] EmailError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Template(e) => AppError::Template(e),
            DispatchError::Email(e) => AppError::Email(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, client_message, log_message) = match &self {
            AppError::Config(e) => {
                let log_msg = e.to_string();
                let client_msg = if is_production() {
                    "Configuration error".to_string()
                } else {
                    log_msg.clone()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", client_msg, log_msg)
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                msg.clone(),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                msg.clone(),
            ),
            AppError::Template(e) => {
                let status = match e {
                    TemplateError::NotFound(_) => StatusCode::NOT_FOUND,
                    TemplateError::MissingVariable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    TemplateError::InvalidTemplate { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let code = match e {
                    TemplateError::NotFound(_) => "TEMPLATE_NOT_FOUND",
                    TemplateError::MissingVariable { .. } => "MISSING_VARIABLE",
                    TemplateError::InvalidTemplate { .. } => "INVALID_TEMPLATE",
                };
                let msg = e.to_string();
                (status, code, msg.clone(), msg)
            }
            AppError::Email(e) => {
                let log_msg = e.to_string();
                let client_msg = if is_production() {
                    "Email delivery failed".to_string()
                } else {
                    log_msg.clone()
                };
                (StatusCode::BAD_GATEWAY, "EMAIL_DELIVERY_ERROR", client_msg, log_msg)
            }
            AppError::Internal(e) => {
                let log_msg = e.clone();
                let client_msg = if is_production() {
                    "Internal server error".to_string()
                } else {
                    log_msg.clone()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", client_msg, log_msg)
            }
        };

        // Always log the detailed error server-side
        tracing::error!(
            code = %code,
            status = %status.as_u16(),
            message = %log_message,
            "API error"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
