//! Guided history rewrite around `git filter-repo`.
//!
//! The actual content-removal algorithm is delegated to the external tool;
//! this module only guards the setup: a full mirror backup is taken before
//! anything destructive, both target directories must be fresh, and no push
//! of any kind happens here. The irreversible force push stays a manual,
//! explicit follow-up step.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::info;

use crate::git::{GitError, GitRepo};

#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("{0} is not a git repository")]
    NotARepo(PathBuf),
    #[error("backup path already exists: {0}")]
    BackupExists(PathBuf),
    #[error("work path already exists: {0}")]
    WorkExists(PathBuf),
    #[error("git filter-repo is not available ({0}); install it with `pip install git-filter-repo`")]
    FilterRepoMissing(String),
    #[error("git filter-repo failed: {0}")]
    FilterRepoFailed(String),
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ScrubRequest {
    pub repo_dir: PathBuf,
    /// Path prefixes to drop from every historical commit.
    pub paths: Vec<String>,
    pub backup_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ScrubReport {
    pub backup_dir: PathBuf,
    pub work_dir: PathBuf,
    pub paths: Vec<String>,
}

/// Sibling `<name>-backup.git` of the repository.
pub fn default_backup_dir(repo_dir: &Path) -> PathBuf {
    sibling(repo_dir, "-backup.git")
}

/// Sibling `<name>-rewrite` of the repository.
pub fn default_work_dir(repo_dir: &Path) -> PathBuf {
    sibling(repo_dir, "-rewrite")
}

fn sibling(repo_dir: &Path, suffix: &str) -> PathBuf {
    let name = repo_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("repo");
    repo_dir
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{name}{suffix}"))
}

/// Backs the repository up, clones it, and rewrites the clone's history.
pub fn run(req: &ScrubRequest) -> Result<ScrubReport, ScrubError> {
    let repo_dir = req.repo_dir.canonicalize()?;
    if !GitRepo::open(&repo_dir).is_repo() {
        return Err(ScrubError::NotARepo(repo_dir));
    }

    let backup_dir = req
        .backup_dir
        .clone()
        .unwrap_or_else(|| default_backup_dir(&repo_dir));
    let work_dir = req
        .work_dir
        .clone()
        .unwrap_or_else(|| default_work_dir(&repo_dir));

    // Refuse to clobber anything. These directories are the safety net.
    if backup_dir.exists() {
        return Err(ScrubError::BackupExists(backup_dir));
    }
    if work_dir.exists() {
        return Err(ScrubError::WorkExists(work_dir));
    }

    info!("taking mirror backup at {}", backup_dir.display());
    GitRepo::clone_mirror(&repo_dir, &backup_dir)?;

    info!("cloning rewrite working copy at {}", work_dir.display());
    GitRepo::clone_local(&repo_dir, &work_dir)?;

    info!("dropping {} path prefix(es) from history", req.paths.len());
    filter_repo(&work_dir, &req.paths)?;

    Ok(ScrubReport {
        backup_dir,
        work_dir,
        paths: req.paths.clone(),
    })
}

fn filter_repo(work_dir: &Path, paths: &[String]) -> Result<(), ScrubError> {
    let mut cmd = Command::new("git");
    cmd.arg("-C")
        .arg(work_dir)
        .arg("filter-repo")
        .arg("--invert-paths");
    for path in paths {
        cmd.arg("--path").arg(path);
    }

    let output = cmd.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.contains("is not a git command") {
            return Err(ScrubError::FilterRepoMissing(stderr));
        }
        return Err(ScrubError::FilterRepoFailed(stderr));
    }
    Ok(())
}
