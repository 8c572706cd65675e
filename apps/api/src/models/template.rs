use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contents of a template's `metadata.json`. Missing fields fall back to
/// defaults; the display name falls back to the template id at read time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateMetadata {
    pub name: Option<String>,
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub author: String,
    pub tags: Vec<String>,
    /// Placeholder names the template claims to use, e.g. `NAME`.
    pub variables: Vec<String>,
    /// Free-form description of supported customizations.
    pub customizations: Value,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Row returned by the template listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub version: String,
    pub author: String,
    pub tags: Vec<String>,
    pub preview_available: bool,
}

/// Full description of a single template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetails {
    #[serde(flatten)]
    pub summary: TemplateSummary,
    pub variables: Vec<String>,
    pub customizations: Value,
    pub available_styles: Vec<String>,
    pub last_modified: Option<DateTime<Utc>>,
}
