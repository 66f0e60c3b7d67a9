//! Upload and download orchestration: planning, retry with backoff, resume.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use hangar_common::artifacts::{self, ArtifactFile};
use tracing::warn;

use crate::client::{HubClient, HubError, RemoteFile};

pub const DEFAULT_MAX_RETRIES: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Per-attempt chunk callback handed to the streaming client.
pub type ChunkFn = Box<dyn FnMut(u64) + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub struct UploadPlan {
    /// Files to upload, in path order.
    pub files: Vec<ArtifactFile>,
    /// Files skipped because their basename already exists remotely.
    pub skipped: Vec<ArtifactFile>,
}

impl UploadPlan {
    pub fn total_bytes(&self) -> u64 {
        artifacts::total_bytes(&self.files)
    }
}

#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub uploaded: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DownloadOutcome {
    pub fetched: Vec<String>,
    pub skipped: Vec<String>,
}

/// Splits discovered artifacts into upload and skip sets.
///
/// `remote` is `Some` only in resume mode; matching is by basename, the name
/// files are stored under in the hub repo.
pub fn plan_upload(found: Vec<ArtifactFile>, remote: Option<&[RemoteFile]>) -> UploadPlan {
    let skip: HashSet<&str> = remote
        .map(|files| files.iter().map(|f| f.basename()).collect())
        .unwrap_or_default();

    let (skipped, files) = found
        .into_iter()
        .partition(|f| skip.contains(f.basename()));
    UploadPlan { files, skipped }
}

/// Exponential backoff after a failed attempt: 1s, 2s, 4s, ...
pub fn backoff_for(attempt: u32) -> Duration {
    INITIAL_BACKOFF * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// Uploads every planned file, retrying each up to `max_retries` times.
///
/// `on_attempt` is called once per attempt and returns the chunk callback
/// for that attempt, so progress bars can reset on retry. A file that
/// exhausts its retries lands in `failed`; the run keeps going.
pub async fn upload(
    client: &HubClient,
    repo_id: &str,
    revision: &str,
    plan: &UploadPlan,
    max_retries: u32,
    mut on_attempt: impl FnMut(&ArtifactFile, usize, usize) -> ChunkFn,
) -> Result<UploadOutcome, HubError> {
    let max_retries = max_retries.max(1);
    let mut outcome = UploadOutcome::default();

    for (idx, file) in plan.files.iter().enumerate() {
        let name = file.basename().to_string();
        let mut uploaded = false;

        for attempt in 1..=max_retries {
            let on_chunk = on_attempt(file, idx, plan.files.len());
            match client
                .upload_file(repo_id, revision, &name, &file.path, on_chunk)
                .await
            {
                Ok(()) => {
                    uploaded = true;
                    break;
                }
                Err(err) => {
                    warn!(
                        "upload failed (attempt {attempt}) for {}: {err}",
                        file.path.display()
                    );
                    if attempt < max_retries {
                        tokio::time::sleep(backoff_for(attempt)).await;
                    }
                }
            }
        }

        if uploaded {
            outcome.uploaded.push(name);
        } else {
            outcome.failed.push(name);
        }
    }

    Ok(outcome)
}

/// Fetches the listed repo files into `out_dir`.
///
/// The caller lists the tree first (it needs the total size for progress
/// anyway). Files already present with the size the hub reports are left
/// alone, so an interrupted download can be resumed by rerunning.
pub async fn download_snapshot(
    client: &HubClient,
    repo_id: &str,
    revision: &str,
    remote: &[RemoteFile],
    out_dir: &Path,
    mut on_file: impl FnMut(&RemoteFile, usize, usize) -> ChunkFn,
) -> Result<DownloadOutcome, HubError> {
    let mut outcome = DownloadOutcome::default();

    for (idx, file) in remote.iter().enumerate() {
        let dest = out_dir.join(&file.path);
        let already_there = file.size > 0
            && std::fs::metadata(&dest)
                .map(|m| m.len() == file.size)
                .unwrap_or(false);
        if already_there {
            outcome.skipped.push(file.path.clone());
            continue;
        }

        let on_chunk = on_file(file, idx, remote.len());
        client
            .download_file(repo_id, revision, &file.path, &dest, on_chunk)
            .await?;
        outcome.fetched.push(file.path.clone());
    }

    Ok(outcome)
}
