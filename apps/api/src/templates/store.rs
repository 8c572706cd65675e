//! Template Store: the process-wide template cache.
//!
//! # Layout
//! ```text
//! <root>/<id>/metadata.json   required; directories without it are skipped
//! <root>/<id>/template.tex    base source, read on first load
//! <root>/<id>/styles/*.tex    optional fragments spliced via %INCLUDE:
//! <root>/<id>/preview.png     optional
//! ```
//!
//! # Concurrency
//! The store holds an immutable `Catalog` snapshot behind an `Arc`. Readers
//! clone the `Arc` and work on that snapshot; `reload` scans into a fresh
//! catalog and swaps the pointer, so readers never see a half-built set.
//! Each entry caches its loaded source in a `OnceLock`, written only after a
//! successful load and validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, info, warn};

use crate::models::template::{TemplateDetails, TemplateMetadata, TemplateSummary};
use crate::templates::includes::splice_style_includes;
use crate::templates::validation::validate_template_source;
use crate::templates::TemplateError;

const METADATA_FILE: &str = "metadata.json";
const SOURCE_FILE: &str = "template.tex";
const STYLES_DIR: &str = "styles";
const PREVIEW_FILE: &str = "preview.png";

/// A template whose source has been assembled and validated.
#[derive(Debug)]
pub struct LoadedTemplate {
    pub id: String,
    pub version: String,
    pub source: String,
}

#[derive(Debug)]
struct TemplateEntry {
    id: String,
    path: PathBuf,
    metadata: TemplateMetadata,
    loaded: OnceLock<Arc<LoadedTemplate>>,
}

impl TemplateEntry {
    fn summary(&self) -> TemplateSummary {
        let meta = &self.metadata;
        TemplateSummary {
            id: self.id.clone(),
            name: meta.name.clone().unwrap_or_else(|| self.id.clone()),
            description: meta.description.clone(),
            category: meta.category.clone(),
            version: meta.version.clone(),
            author: meta.author.clone(),
            tags: meta.tags.clone(),
            preview_available: self.path.join(PREVIEW_FILE).is_file(),
        }
    }
}

#[derive(Debug, Default)]
struct Catalog {
    entries: HashMap<String, TemplateEntry>,
}

pub struct TemplateStore {
    root: PathBuf,
    catalog: RwLock<Arc<Catalog>>,
}

impl TemplateStore {
    /// Scans `root` and returns a store over the discovered templates.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let catalog = scan(&root);
        Self {
            root,
            catalog: RwLock::new(Arc::new(catalog)),
        }
    }

    fn snapshot(&self) -> Arc<Catalog> {
        self.catalog
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Rescans the repository and atomically replaces the catalog.
    /// Returns the number of templates discovered.
    pub fn reload(&self) -> usize {
        info!("Reloading templates...");
        let fresh = Arc::new(scan(&self.root));
        let count = fresh.entries.len();
        *self
            .catalog
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = fresh;
        count
    }

    pub fn len(&self) -> usize {
        self.snapshot().entries.len()
    }

    /// Summaries of all templates, sorted by display name.
    pub fn list(&self) -> Vec<TemplateSummary> {
        let catalog = self.snapshot();
        let mut templates: Vec<TemplateSummary> =
            catalog.entries.values().map(TemplateEntry::summary).collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        templates
    }

    /// Full details for one template, or `None` if the id is unknown.
    pub fn describe(&self, id: &str) -> Option<TemplateDetails> {
        let catalog = self.snapshot();
        let entry = catalog.entries.get(id)?;

        let last_modified = std::fs::metadata(&entry.path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .ok();

        let customizations = if entry.metadata.customizations.is_null() {
            json!({})
        } else {
            entry.metadata.customizations.clone()
        };

        Some(TemplateDetails {
            summary: entry.summary(),
            variables: entry.metadata.variables.clone(),
            customizations,
            available_styles: style_names(&entry.path.join(STYLES_DIR)),
            last_modified,
        })
    }

    /// Returns the assembled, validated source for `id`, loading it on first use.
    pub fn load(&self, id: &str) -> Result<Arc<LoadedTemplate>, TemplateError> {
        let catalog = self.snapshot();
        let entry = catalog
            .entries
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        if let Some(loaded) = entry.loaded.get() {
            return Ok(Arc::clone(loaded));
        }

        let loaded = Arc::new(load_entry(entry)?);
        // A concurrent loader may have won; either copy is identical.
        let _ = entry.loaded.set(Arc::clone(&loaded));
        info!("Loaded template: {id}");
        Ok(entry.loaded.get().cloned().unwrap_or(loaded))
    }

    /// Raw bytes of the template's preview image, if it has one.
    pub fn preview(&self, id: &str) -> Result<Option<Vec<u8>>, TemplateError> {
        let catalog = self.snapshot();
        let entry = catalog
            .entries
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        let path = entry.path.join(PREVIEW_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }
}

fn load_entry(entry: &TemplateEntry) -> Result<LoadedTemplate, TemplateError> {
    let invalid = |reason: String| TemplateError::Invalid {
        id: entry.id.clone(),
        reason,
    };

    let source_path = entry.path.join(SOURCE_FILE);
    if !source_path.is_file() {
        return Err(invalid(format!("missing {SOURCE_FILE}")));
    }
    let base = std::fs::read_to_string(&source_path)
        .map_err(|e| invalid(format!("failed to read {SOURCE_FILE}: {e}")))?;

    let source = splice_style_includes(&base, &entry.path.join(STYLES_DIR));
    validate_template_source(&source, &entry.metadata.variables).map_err(invalid)?;

    Ok(LoadedTemplate {
        id: entry.id.clone(),
        version: entry.metadata.version.clone(),
        source,
    })
}

fn scan(root: &Path) -> Catalog {
    info!("Scanning for available templates in {}", root.display());

    let dir = match std::fs::read_dir(root) {
        Ok(dir) => dir,
        Err(e) => {
            warn!("Templates directory {} is not readable: {e}", root.display());
            return Catalog::default();
        }
    };

    let mut entries = HashMap::new();
    for item in dir.flatten() {
        let path = item.path();
        if !path.is_dir() {
            continue;
        }
        let id = item.file_name().to_string_lossy().into_owned();

        let metadata_path = path.join(METADATA_FILE);
        if !metadata_path.is_file() {
            warn!("Template {id} missing {METADATA_FILE}");
            continue;
        }

        match read_metadata(&metadata_path) {
            Ok(metadata) => {
                info!("Found template: {id}");
                entries.insert(
                    id.clone(),
                    TemplateEntry {
                        id,
                        path,
                        metadata,
                        loaded: OnceLock::new(),
                    },
                );
            }
            Err(e) => error!("Error scanning template {id}: {e:#}"),
        }
    }

    info!("Scanned {} templates", entries.len());
    Catalog { entries }
}

fn read_metadata(path: &Path) -> anyhow::Result<TemplateMetadata> {
    use anyhow::Context;

    let raw = std::fs::read_to_string(path).context("reading metadata")?;
    serde_json::from_str(&raw).context("parsing metadata")
}

fn style_names(styles_dir: &Path) -> Vec<String> {
    let Ok(dir) = std::fs::read_dir(styles_dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = dir
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "tex"))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}
