//! REST client for the model hub.
//!
//! The base URL is configurable so tests and private mirrors can point the
//! client elsewhere; the default is the public hub. Uploads and downloads
//! are streamed so multi-gigabyte weight files never sit in memory, and a
//! per-chunk callback feeds the progress bars.

use std::path::Path;

use futures_util::TryStreamExt;
use reqwest::{Body, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

pub const DEFAULT_BASE_URL: &str = "https://huggingface.co";

#[derive(Debug, Error)]
pub enum HubError {
    #[error("hub request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("local file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("hub responded {status} for {repo_id}: {body}")]
    Status {
        repo_id: String,
        status: StatusCode,
        body: String,
    },
}

/// One entry of a repo tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFile {
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl RemoteFile {
    /// File name without its directory, the key used for resume matching.
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

pub struct HubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HubClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, HubError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hangar/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub fn tree_url(&self, repo_id: &str, revision: &str) -> String {
        format!(
            "{}/api/models/{repo_id}/tree/{revision}?recursive=true",
            self.base_url
        )
    }

    pub fn resolve_url(&self, repo_id: &str, revision: &str, path: &str) -> String {
        format!("{}/{repo_id}/resolve/{revision}/{path}", self.base_url)
    }

    pub fn upload_url(&self, repo_id: &str, revision: &str, path: &str) -> String {
        format!(
            "{}/api/models/{repo_id}/upload/{revision}/{path}",
            self.base_url
        )
    }

    /// Creates a private model repo. Returns `false` when it already exists.
    pub async fn create_repo(&self, repo_id: &str) -> Result<bool, HubError> {
        let (organization, name) = match repo_id.split_once('/') {
            Some((org, name)) => (Some(org), name),
            None => (None, repo_id),
        };
        let payload = serde_json::json!({
            "type": "model",
            "name": name,
            "organization": organization,
            "private": true,
        });

        let resp = self
            .authed(self.http.post(format!("{}/api/repos/create", self.base_url)))
            .json(&payload)
            .send()
            .await?;
        if resp.status() == StatusCode::CONFLICT {
            return Ok(false);
        }
        if !resp.status().is_success() {
            return Err(status_error(repo_id, resp).await);
        }
        Ok(true)
    }

    /// Lists the files of a repo revision, with sizes where the hub reports them.
    pub async fn list_files(
        &self,
        repo_id: &str,
        revision: &str,
    ) -> Result<Vec<RemoteFile>, HubError> {
        let resp = self
            .authed(self.http.get(self.tree_url(repo_id, revision)))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(repo_id, resp).await);
        }
        let entries: Vec<RemoteFile> = resp.json().await?;
        Ok(entries
            .into_iter()
            .filter(|e| e.kind.is_empty() || e.kind == "file")
            .collect())
    }

    /// Streams a local file to the hub, reporting each chunk to `on_chunk`.
    pub async fn upload_file<F>(
        &self,
        repo_id: &str,
        revision: &str,
        path_in_repo: &str,
        local: &Path,
        mut on_chunk: F,
    ) -> Result<(), HubError>
    where
        F: FnMut(u64) + Send + Sync + 'static,
    {
        let file = File::open(local).await?;
        let size = file.metadata().await?.len();
        let stream =
            ReaderStream::new(file).inspect_ok(move |chunk| on_chunk(chunk.len() as u64));

        let resp = self
            .authed(
                self.http
                    .put(self.upload_url(repo_id, revision, path_in_repo)),
            )
            .header(reqwest::header::CONTENT_LENGTH, size)
            .body(Body::wrap_stream(stream))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(repo_id, resp).await);
        }
        Ok(())
    }

    /// Streams a repo file to `dest`, returning the number of bytes written.
    pub async fn download_file<F>(
        &self,
        repo_id: &str,
        revision: &str,
        path: &str,
        dest: &Path,
        mut on_chunk: F,
    ) -> Result<u64, HubError>
    where
        F: FnMut(u64) + Send,
    {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let resp = self
            .authed(self.http.get(self.resolve_url(repo_id, revision, path)))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(repo_id, resp).await);
        }

        let mut out = File::create(dest).await?;
        let mut stream = resp.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = stream.try_next().await? {
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
            on_chunk(chunk.len() as u64);
        }
        out.flush().await?;
        Ok(written)
    }
}

async fn status_error(repo_id: &str, resp: reqwest::Response) -> HubError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    HubError::Status {
        repo_id: repo_id.to_string(),
        status,
        body,
    }
}
