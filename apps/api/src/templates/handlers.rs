//! Axum route handlers for the Template API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::templates::TemplateStore;

/// Runs a catalog operation on the blocking pool; the store touches the filesystem.
async fn with_store<T, F>(store: Arc<TemplateStore>, op: F) -> Result<T, AppError>
where
    F: FnOnce(&TemplateStore) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("template task failed: {e}")))
}

/// GET /templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let templates = with_store(state.templates, |store| store.list()).await?;
    Ok(Json(json!({
        "success": true,
        "templates": templates
    })))
}

/// GET /templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let lookup = id.clone();
    let template = with_store(state.templates, move |store| store.describe(&lookup))
        .await?
        .ok_or(AppError::TemplateNotFound(id))?;

    Ok(Json(json!({
        "success": true,
        "template": template
    })))
}

/// GET /templates/:id/preview
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let lookup = id.clone();
    let bytes = with_store(state.templates, move |store| store.preview(&lookup))
        .await??
        .ok_or(AppError::TemplateNotFound(id))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

/// POST /templates/reload
///
/// Rescans the template directory and drops every cached source.
pub async fn handle_reload_templates(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let count = with_store(state.templates, |store| store.reload()).await?;
    info!("Template reload complete: {count} templates");

    Ok(Json(json!({
        "success": true,
        "count": count
    })))
}
