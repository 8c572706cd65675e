use std::sync::Arc;

use crate::compiler::DocumentCompiler;
use crate::templates::TemplateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Template cache owned by this service instance.
    pub templates: Arc<TemplateStore>,
    /// Pluggable compiler. Default: `LatexCompiler` running pdflatex.
    pub compiler: Arc<dyn DocumentCompiler>,
}
