// Template repository: discovery, loading, validation and caching.
// One directory per template id; see `store` for the expected layout.

pub mod handlers;
pub mod includes;
pub mod store;
pub mod validation;

use thiserror::Error;

pub use store::TemplateStore;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    /// The template exists but cannot be used.
    #[error("Template '{id}' is invalid: {reason}")]
    Invalid { id: String, reason: String },

    #[error("Template I/O error: {0}")]
    Io(#[from] std::io::Error),
}
