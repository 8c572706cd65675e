// Compilation: subprocess invocation, diagnostic parsing, artifact encoding,
// and the request pipeline that ties loading, assembly and compilation together.
// The compiler sits behind `DocumentCompiler` so the pipeline can be driven
// by any implementation.

pub mod artifact;
pub mod diagnostics;
pub mod handlers;
pub mod invoker;
pub mod pipeline;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use artifact::EncodedArtifact;
pub use diagnostics::Diagnostic;
pub use invoker::LatexCompiler;

#[derive(Debug, Error)]
pub enum CompileError {
    /// Non-zero exit or no output file. `output` is stdout and stderr joined.
    #[error("LaTeX compilation failed (exit code {exit_code:?})")]
    Failed {
        exit_code: Option<i32>,
        output: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("LaTeX compilation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Compilation I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns final LaTeX source into an encoded PDF.
///
/// Carried in `AppState` as `Arc<dyn DocumentCompiler>`.
#[async_trait]
pub trait DocumentCompiler: Send + Sync {
    async fn compile(&self, source: &str) -> Result<EncodedArtifact, CompileError>;
}
