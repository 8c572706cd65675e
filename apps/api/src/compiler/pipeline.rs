//! Render pipeline: one compile request end to end.
//!
//! Flow: load template → assemble source → compile → encode → metadata.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::compiler::DocumentCompiler;
use crate::errors::AppError;
use crate::models::request::CompileRequest;
use crate::render::assemble;
use crate::templates::TemplateStore;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResume {
    pub pdf_base64: String,
    pub metadata: RenderMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderMetadata {
    /// Estimated from the PDF bytes; see `artifact::estimate_page_count`.
    pub pages: usize,
    /// Human-readable duration, e.g. `"1.42s"`.
    pub compilation_time: String,
    pub compilation_time_seconds: f64,
    pub template_id: String,
    pub template_version: String,
    pub file_size: u64,
    pub file_size_bytes: u64,
}

pub async fn render_resume(
    templates: Arc<TemplateStore>,
    compiler: &dyn DocumentCompiler,
    request: CompileRequest,
) -> Result<RenderedResume, AppError> {
    let job_id = Uuid::new_v4();
    let started = Instant::now();
    info!("[{job_id}] Compiling resume with template: {}", request.template_id);

    let template_id = request.template_id.clone();
    let template = tokio::task::spawn_blocking(move || templates.load(&template_id))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("template load task failed: {e}")))??;

    if let Some(sections) = request
        .customizations
        .as_ref()
        .and_then(|c| c.sections.as_ref())
    {
        debug!("[{job_id}] Requested section order: {sections:?}");
    }

    let source = assemble(
        &template.source,
        &request.content,
        request.customizations.as_ref(),
    );

    let artifact = compiler.compile(&source).await?;
    let elapsed = started.elapsed().as_secs_f64();

    let metadata = RenderMetadata {
        pages: artifact.pages,
        compilation_time: format!("{elapsed:.2}s"),
        compilation_time_seconds: elapsed,
        template_id: template.id.clone(),
        template_version: template.version.clone(),
        file_size: artifact.size_bytes,
        file_size_bytes: artifact.size_bytes,
    };
    info!(
        "[{job_id}] Resume compiled in {:.2}s: {} pages, {} bytes",
        elapsed, metadata.pages, metadata.file_size
    );

    Ok(RenderedResume {
        pdf_base64: artifact.base64,
        metadata,
    })
}
