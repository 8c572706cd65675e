use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compiler::{CompileError, Diagnostic};
use crate::templates::TemplateError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Every field-level violation found in the request, in discovery order.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("{message}")]
    Compilation {
        message: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(id) => AppError::TemplateNotFound(id),
            TemplateError::Invalid { .. } => AppError::InvalidTemplate(err.to_string()),
            TemplateError::Io(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl From<CompileError> for AppError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Failed {
                exit_code,
                output,
                diagnostics,
            } => {
                tracing::debug!("Compiler exit code {exit_code:?}, output:\n{output}");
                AppError::Compilation {
                    message: "LaTeX compilation failed".to_string(),
                    diagnostics,
                }
            }
            CompileError::TimedOut(limit) => AppError::Compilation {
                message: format!(
                    "LaTeX compilation exceeded {}s and was terminated",
                    limit.as_secs()
                ),
                diagnostics: Vec::new(),
            },
            CompileError::Io(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(details) => {
                tracing::warn!("Rejected request with {} validation errors", details.len());
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "success": false,
                        "error": "Validation failed",
                        "details": details
                    }),
                )
            }
            AppError::TemplateNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({
                    "success": false,
                    "error": format!("Template {id} not found")
                }),
            ),
            AppError::InvalidTemplate(msg) => {
                tracing::error!("Invalid template: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({
                        "success": false,
                        "error": msg
                    }),
                )
            }
            AppError::Compilation {
                message,
                diagnostics,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "success": false,
                    "error": message,
                    "details": diagnostics
                }),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": "An internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
