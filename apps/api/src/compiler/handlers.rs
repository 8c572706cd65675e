//! Axum route handler for the Compile API.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::compiler::pipeline::render_resume;
use crate::errors::AppError;
use crate::models::request::parse_compile_request;
use crate::state::AppState;

/// POST /compile
///
/// Validates the body, renders the template with the supplied content and
/// returns the PDF as base64 with its metadata.
pub async fn handle_compile(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let request = parse_compile_request(&body).map_err(AppError::Validation)?;

    let rendered =
        render_resume(state.templates.clone(), state.compiler.as_ref(), request).await?;

    Ok(Json(json!({
        "success": true,
        "pdfBase64": rendered.pdf_base64,
        "metadata": rendered.metadata
    })))
}
