//! # Model Artifact Discovery
//!
//! Defines which files count as model weights and how they are found on disk.
//!
//! Artifact repositories mix weights with configs, readmes and tokenizer
//! assets; only the weight extensions below are subject to publish guarding
//! and hub transfer.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File extensions treated as model weight artifacts.
pub const WEIGHT_EXTS: &[&str] = &["gguf", "bin", "safetensors", "pt", "ckpt"];

/// A weight file found on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub size: u64,
}

impl ArtifactFile {
    /// File name without its directory, the key used for hub resume matching.
    pub fn basename(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// True when the path carries one of the recognized weight extensions.
pub fn is_weight_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| WEIGHT_EXTS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collects weight files under `root`, sorted by path.
///
/// A missing root yields an empty list rather than an error, so callers can
/// monitor a directory that has not been populated yet.
pub fn find_artifacts(root: &Path) -> anyhow::Result<Vec<ArtifactFile>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_weight_file(entry.path()) {
            continue;
        }
        let size = entry.metadata()?.len();
        found.push(ArtifactFile {
            path: entry.path().to_path_buf(),
            size,
        });
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}

/// Sum of artifact sizes in bytes.
pub fn total_bytes(files: &[ArtifactFile]) -> u64 {
    files.iter().map(|f| f.size).sum()
}
