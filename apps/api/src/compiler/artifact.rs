//! Artifact Encoder: reads the compiled PDF and prepares it for transport.
//!
//! The page count is an estimate from scanning raw bytes for page objects.
//! PDFs that keep their page objects inside compressed object streams carry
//! no visible marker and are reported as a single page.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

const PAGE_MARKERS: &[&str] = &["/Type /Page", "/Type/Page"];

#[derive(Debug, Clone, Serialize)]
pub struct EncodedArtifact {
    pub base64: String,
    pub size_bytes: u64,
    pub pages: usize,
}

pub async fn encode_artifact(path: &Path) -> std::io::Result<EncodedArtifact> {
    let bytes = tokio::fs::read(path).await?;
    let size_bytes = tokio::fs::metadata(path).await?.len();

    Ok(EncodedArtifact {
        base64: STANDARD.encode(&bytes),
        size_bytes,
        pages: estimate_page_count(&bytes),
    })
}

/// Counts `/Type /Page` objects, skipping the `/Type /Pages` tree nodes.
/// Never returns less than 1.
pub fn estimate_page_count(bytes: &[u8]) -> usize {
    let decoded = String::from_utf8_lossy(bytes);
    let text: &str = &decoded;
    let count: usize = PAGE_MARKERS
        .iter()
        .map(|marker| {
            text.match_indices(marker)
                .filter(|(idx, _)| !text[idx + marker.len()..].starts_with('s'))
                .count()
        })
        .sum();
    count.max(1)
}
