use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root of the template repository, one sub-directory per template id.
    pub templates_dir: PathBuf,
    /// Parent directory for per-request compilation scratch directories.
    pub work_dir: PathBuf,
    /// Compiler executable, resolved through PATH when not absolute.
    pub compiler: String,
    pub compile_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            templates_dir: PathBuf::from(env_or("TEMPLATES_DIR", "/app/templates")),
            work_dir: PathBuf::from(env_or("LATEX_WORK_DIR", "/tmp/latex-work")),
            compiler: env_or("LATEX_COMPILER", "pdflatex"),
            compile_timeout: Duration::from_secs(
                env_or("COMPILE_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("COMPILE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
