//! Local artifact inventory, the pre-upload health check.
//!
//! Each direct subdirectory of the models root is one model. A model is
//! healthy when it carries at least one weight file; tokenizer assets are
//! reported but not required (vision and diffusion models have none).

use std::path::{Path, PathBuf};

use hangar_common::artifacts;
use serde::Serialize;
use walkdir::WalkDir;

#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub name: String,
    pub files: usize,
    pub total_bytes: u64,
    pub has_weights: bool,
    pub has_tokenizer: bool,
}

#[derive(Debug, Serialize)]
pub struct InventoryReport {
    pub root: PathBuf,
    pub models: Vec<ModelEntry>,
}

impl InventoryReport {
    /// A report is healthy when every model directory has weight files.
    pub fn healthy(&self) -> bool {
        self.models.iter().all(|m| m.has_weights)
    }
}

/// True for tokenizer/vocabulary assets shipped next to weights.
pub fn is_tokenizer_file(name: &str) -> bool {
    name.ends_with(".spm") || name == "vocab.json" || name.contains("tokenizer")
}

/// Scans the models root; a missing root yields an empty report.
pub fn scan(root: &Path) -> anyhow::Result<InventoryReport> {
    let mut models = Vec::new();
    if !root.exists() {
        return Ok(InventoryReport {
            root: root.to_path_buf(),
            models,
        });
    }

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.path())
        .collect();
    dirs.sort();

    for dir in dirs {
        models.push(scan_model(&dir)?);
    }

    Ok(InventoryReport {
        root: root.to_path_buf(),
        models,
    })
}

fn scan_model(dir: &Path) -> anyhow::Result<ModelEntry> {
    let mut files = 0usize;
    let mut total_bytes = 0u64;
    let mut has_weights = false;
    let mut has_tokenizer = false;

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        files += 1;
        total_bytes += entry.metadata()?.len();
        if artifacts::is_weight_file(entry.path()) {
            has_weights = true;
        }
        if is_tokenizer_file(&entry.file_name().to_string_lossy()) {
            has_tokenizer = true;
        }
    }

    Ok(ModelEntry {
        name: dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string(),
        files,
        total_bytes,
        has_weights,
        has_tokenizer,
    })
}
