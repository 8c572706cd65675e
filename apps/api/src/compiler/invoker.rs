//! Compilation Invoker: runs the external LaTeX compiler as a bounded subprocess.
//!
//! # Isolation
//! Every call gets its own `tempfile::TempDir` under the configured work root.
//! The directory is owned by the call's stack frame, so it is removed on every
//! exit path: success, compiler failure, I/O error or timeout.
//!
//! # Timeout
//! The child is spawned with `kill_on_drop(true)` and awaited under
//! `tokio::time::timeout`. When the budget runs out the wait future is dropped,
//! which drops the `Child` and kills the process.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::compiler::artifact::{encode_artifact, EncodedArtifact};
use crate::compiler::diagnostics::parse_diagnostics;
use crate::compiler::{CompileError, DocumentCompiler};

const SOURCE_FILE: &str = "resume.tex";
const OUTPUT_FILE: &str = "resume.pdf";
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct LatexCompiler {
    program: String,
    work_dir: PathBuf,
    timeout: Duration,
}

impl LatexCompiler {
    pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            work_dir: work_dir.into(),
            timeout,
        }
    }

    /// Startup self-check: `<program> --version` must exit cleanly within 10s.
    pub async fn verify_installation(&self) -> anyhow::Result<()> {
        let output = tokio::time::timeout(
            VERIFY_TIMEOUT,
            Command::new(&self.program)
                .arg("--version")
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .with_context(|| format!("`{} --version` timed out", self.program))?
        .with_context(|| format!("LaTeX compiler `{}` could not be started", self.program))?;

        if !output.status.success() {
            bail!(
                "`{} --version` exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        info!(
            "LaTeX installation verified: {}",
            stdout.lines().next().unwrap_or(self.program.as_str())
        );
        Ok(())
    }
}

#[async_trait]
impl DocumentCompiler for LatexCompiler {
    async fn compile(&self, source: &str) -> Result<EncodedArtifact, CompileError> {
        let workdir = tempfile::Builder::new()
            .prefix("resume-")
            .tempdir_in(&self.work_dir)?;
        let dir = workdir.path();

        tokio::fs::write(dir.join(SOURCE_FILE), source).await?;
        debug!("Compiling {} in {}", SOURCE_FILE, dir.display());

        let child = Command::new(&self.program)
            .arg("-interaction=nonstopmode")
            .arg("-output-directory")
            .arg(dir)
            .arg(SOURCE_FILE)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(
                    "LaTeX compilation exceeded {:?}; compiler process killed",
                    self.timeout
                );
                return Err(CompileError::TimedOut(self.timeout));
            }
        };

        let pdf_path = dir.join(OUTPUT_FILE);
        if !output.status.success() || !pdf_path.is_file() {
            let raw = format!(
                "{}\n{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            let diagnostics = parse_diagnostics(&raw);
            warn!(
                "LaTeX compilation failed (status {}, {} diagnostics)",
                output.status,
                diagnostics.len()
            );
            return Err(CompileError::Failed {
                exit_code: output.status.code(),
                output: raw,
                diagnostics,
            });
        }

        Ok(encode_artifact(&pdf_path).await?)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Writes an executable shell script standing in for pdflatex.
    fn fake_compiler(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-latex");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn leftover_entries(work: &Path) -> usize {
        std::fs::read_dir(work).unwrap().count()
    }

    const WRITES_PDF: &str = r#"[ "$1" = "-interaction=nonstopmode" ] || exit 3
[ -f resume.tex ] || exit 4
printf '%%PDF-1.4\n3 0 obj << /Type /Page >> endobj\n' > resume.pdf
echo "Output written on resume.pdf (1 page)""#;

    #[tokio::test]
    async fn test_successful_compile_encodes_output() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let compiler = LatexCompiler::new(
            fake_compiler(bin.path(), WRITES_PDF),
            work.path(),
            Duration::from_secs(10),
        );

        let artifact = compiler.compile("\\documentclass{article}").await.unwrap();
        let expected = b"%PDF-1.4\n3 0 obj << /Type /Page >> endobj\n";
        assert_eq!(artifact.size_bytes, expected.len() as u64);
        assert_eq!(artifact.pages, 1);
        assert!(!artifact.base64.is_empty());
        assert_eq!(leftover_entries(work.path()), 0);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_with_diagnostics() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let script = "echo 'This is pdfTeX'\necho '! Undefined control sequence.'\necho 'l.7 \\foo'\necho 'oops' >&2\nexit 1";
        let compiler = LatexCompiler::new(
            fake_compiler(bin.path(), script),
            work.path(),
            Duration::from_secs(10),
        );

        match compiler.compile("x").await {
            Err(CompileError::Failed {
                exit_code,
                output,
                diagnostics,
            }) => {
                assert_eq!(exit_code, Some(1));
                assert!(output.contains("This is pdfTeX"));
                assert!(output.contains("oops"));
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(diagnostics[0].message, "Undefined control sequence.");
            }
            other => panic!("expected compile failure, got {other:?}"),
        }
        assert_eq!(leftover_entries(work.path()), 0);
    }

    #[tokio::test]
    async fn test_zero_exit_without_pdf_is_failure() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let compiler = LatexCompiler::new(
            fake_compiler(bin.path(), "echo 'No pages of output.'\nexit 0"),
            work.path(),
            Duration::from_secs(10),
        );

        assert!(matches!(
            compiler.compile("x").await,
            Err(CompileError::Failed { exit_code: Some(0), .. })
        ));
        assert_eq!(leftover_entries(work.path()), 0);
    }

    #[tokio::test]
    async fn test_timeout_kills_compiler_and_cleans_up() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let compiler = LatexCompiler::new(
            fake_compiler(bin.path(), "exec sleep 30"),
            work.path(),
            Duration::from_millis(300),
        );

        let started = std::time::Instant::now();
        let result = compiler.compile("x").await;
        assert!(matches!(result, Err(CompileError::TimedOut(_))));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(leftover_entries(work.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let work = tempfile::tempdir().unwrap();
        let compiler = LatexCompiler::new(
            "/nonexistent/pdflatex",
            work.path(),
            Duration::from_secs(1),
        );
        assert!(matches!(compiler.compile("x").await, Err(CompileError::Io(_))));
        assert_eq!(leftover_entries(work.path()), 0);
    }

    #[tokio::test]
    async fn test_verify_installation() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();

        let ok = LatexCompiler::new(
            fake_compiler(bin.path(), "echo 'pdfTeX 3.141592653-2.6-1.40.25'"),
            work.path(),
            Duration::from_secs(1),
        );
        assert!(ok.verify_installation().await.is_ok());

        let missing = LatexCompiler::new("/nonexistent/pdflatex", work.path(), Duration::from_secs(1));
        assert!(missing.verify_installation().await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_compiles_use_separate_directories() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        // Echo the source back as the "PDF" so each caller can check it got its own.
        let compiler = std::sync::Arc::new(LatexCompiler::new(
            fake_compiler(bin.path(), "sleep 0.2\ncp resume.tex resume.pdf"),
            work.path(),
            Duration::from_secs(10),
        ));

        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let compiler = std::sync::Arc::clone(&compiler);
                tokio::spawn(async move { (i, compiler.compile(&format!("doc-{i}")).await) })
            })
            .collect();

        use base64::{engine::general_purpose::STANDARD, Engine};
        for task in tasks {
            let (i, result) = task.await.unwrap();
            let bytes = STANDARD.decode(result.unwrap().base64).unwrap();
            assert_eq!(bytes, format!("doc-{i}").into_bytes());
        }
        assert_eq!(leftover_entries(work.path()), 0);
    }

    #[tokio::test]
    #[ignore = "requires a local pdflatex installation"]
    async fn test_real_pdflatex() {
        let work = tempfile::tempdir().unwrap();
        let compiler = LatexCompiler::new("pdflatex", work.path(), Duration::from_secs(60));
        compiler.verify_installation().await.unwrap();

        let artifact = compiler
            .compile("\\documentclass{article}\\begin{document}Hello\\end{document}")
            .await
            .unwrap();
        assert!(artifact.size_bytes > 0);
        assert!(artifact.pages >= 1);
    }
}
