//! The guarded publish operation.
//!
//! Publishing refuses outright when the repository tracks artifact or secret
//! paths, when no push remote exists, or when the remote does not use SSH.
//! All refusals happen before any network contact, and every outcome is
//! recorded in the publish log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::info;

use crate::git::{GitError, GitRepo};

/// Path prefixes that must never reach a source remote.
pub const DEFAULT_DISALLOWED: &[&str] = &["models/", "checkpoints/", "secrets/"];
/// Default publish log, relative to the repository root.
pub const DEFAULT_LOG_FILE: &str = ".hangar/publish.log";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("disallowed paths are tracked: {}", .0.join(", "))]
    DisallowedTracked(Vec<String>),
    #[error("no remote named '{0}' is configured")]
    NoRemote(String),
    #[error("remote '{0}' does not use SSH transport: {1}")]
    InsecureRemote(String, String),
    #[error(transparent)]
    Git(#[from] GitError),
    #[error("failed to write publish log: {0}")]
    Log(std::io::Error),
}

impl PublishError {
    /// Process exit code contract: 2 disallowed paths, 3 no remote, 4 insecure remote.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DisallowedTracked(_) => 2,
            Self::NoRemote(_) => 3,
            Self::InsecureRemote(..) => 4,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub repo_dir: PathBuf,
    pub remote: String,
    pub message: String,
    pub disallowed: Vec<String>,
    /// Log file; joined onto `repo_dir` when relative.
    pub log_path: PathBuf,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Clean working tree; nothing was committed or pushed.
    NothingToCommit,
    Pushed { changes: usize },
}

/// True when the remote URL uses an SSH transport form.
///
/// Accepts `ssh://` URLs and scp-like `user@host:path` syntax; anything
/// else (https, git://, local paths) is refused.
pub fn is_ssh_remote(url: &str) -> bool {
    if url.starts_with("ssh://") {
        return true;
    }
    match url.split_once('@') {
        Some((user, rest)) => !user.contains([':', '/']) && rest.contains(':'),
        None => false,
    }
}

/// Tracked paths that fall under one of the disallowed prefixes.
pub fn tracked_violations(tracked: &[String], disallowed: &[String]) -> Vec<String> {
    tracked
        .iter()
        .filter(|path| {
            disallowed.iter().any(|prefix| {
                let dir = prefix.trim_end_matches('/');
                path.as_str() == dir || path.starts_with(&format!("{dir}/"))
            })
        })
        .cloned()
        .collect()
}

/// Runs the guarded publish against the request's repository.
pub fn run(req: &PublishRequest) -> Result<PublishOutcome, PublishError> {
    let repo = GitRepo::open(&req.repo_dir);

    let tracked = repo.tracked_paths()?;
    let violations = tracked_violations(&tracked, &req.disallowed);
    if !violations.is_empty() {
        log_entry(
            req,
            &format!("refused: disallowed tracked paths: {}", violations.join(", ")),
        )?;
        return Err(PublishError::DisallowedTracked(violations));
    }

    let url = repo
        .remote_url(&req.remote)?
        .ok_or_else(|| PublishError::NoRemote(req.remote.clone()))?;
    if !is_ssh_remote(&url) {
        log_entry(
            req,
            &format!("refused: remote '{}' is not SSH: {url}", req.remote),
        )?;
        return Err(PublishError::InsecureRemote(req.remote.clone(), url));
    }

    // The log itself must never count as a change or get committed.
    let exclude = log_exclude(req);
    let pending = repo.pending_changes(exclude.as_deref())?;
    if pending.is_empty() {
        info!("working tree clean");
        log_entry(req, "nothing to commit")?;
        return Ok(PublishOutcome::NothingToCommit);
    }

    repo.stage_all(exclude.as_deref())?;
    repo.commit(&req.message)?;
    let transcript = repo.push(&req.remote)?;
    log_entry(
        req,
        &format!(
            "pushed {} change(s) to '{}'\n{}",
            pending.len(),
            req.remote,
            transcript.trim_end()
        ),
    )?;

    Ok(PublishOutcome::Pushed {
        changes: pending.len(),
    })
}

/// Absolute location of the publish log for a request.
pub fn log_file(req: &PublishRequest) -> PathBuf {
    if req.log_path.is_absolute() {
        req.log_path.clone()
    } else {
        req.repo_dir.join(&req.log_path)
    }
}

/// Pathspec keeping the publish log out of staging and status, or `None`
/// when the log lives outside the repository.
fn log_exclude(req: &PublishRequest) -> Option<String> {
    let rel = if req.log_path.is_absolute() {
        req.log_path.strip_prefix(&req.repo_dir).ok()?
    } else {
        req.log_path.as_path()
    };
    Some(format!(":(exclude){}", rel.display()))
}

fn log_entry(req: &PublishRequest, line: &str) -> Result<(), PublishError> {
    let path = log_file(req);
    append_line(&path, line).map_err(PublishError::Log)
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(
        file,
        "[{}] {line}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}
