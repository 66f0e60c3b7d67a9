//! Hub token resolution.
//!
//! The token is never stored in the repository: it lives either in an
//! environment variable or in a git-ignored file under `secrets/`.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable consulted first.
pub const DEFAULT_TOKEN_ENV: &str = "HF_TOKEN";
/// Git-ignored fallback file, relative to the working directory.
pub const DEFAULT_TOKEN_FILE: &str = "secrets/hub_token.txt";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no hub token found: set ${env_var} or create {file}")]
    Missing { env_var: String, file: String },
    #[error("failed to read token file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolves the hub token: environment first, then the token file.
pub fn resolve(env_var: &str, token_file: &Path) -> Result<String, TokenError> {
    if let Ok(value) = std::env::var(env_var) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    if token_file.exists() {
        let raw = std::fs::read_to_string(token_file).map_err(|source| TokenError::Unreadable {
            path: token_file.to_path_buf(),
            source,
        })?;
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    Err(TokenError::Missing {
        env_var: env_var.to_string(),
        file: token_file.display().to_string(),
    })
}

/// Best-effort lookup for operations where anonymous access may still work.
pub fn resolve_optional(env_var: &str, token_file: &Path) -> Option<String> {
    resolve(env_var, token_file).ok()
}
