use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use hangar_common::config::Config;
use hangar_common::token::{self, DEFAULT_TOKEN_ENV, DEFAULT_TOKEN_FILE};
use hangar_common::{info, success, warn};
use hangar_hub::client::{DEFAULT_BASE_URL, HubClient};
use hangar_hub::transfer;

use crate::terminal::progress::TransferBars;

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Hub repo id (e.g. org/aurora-models)
    #[arg(long)]
    pub repo_id: String,
    /// Output directory for the snapshot
    #[arg(long, default_value = "models")]
    pub out: PathBuf,
    /// Branch to download
    #[arg(long, default_value = "main")]
    pub revision: String,
    /// Environment variable holding the hub token
    #[arg(long, default_value = DEFAULT_TOKEN_ENV)]
    pub token_env: String,
    /// Hub endpoint override, for mirrors
    #[arg(long, default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,
}

pub async fn download(args: DownloadArgs, _cfg: &Config) -> anyhow::Result<ExitCode> {
    // Public repos download anonymously, so a missing token is only a note.
    let hub_token = token::resolve_optional(&args.token_env, Path::new(DEFAULT_TOKEN_FILE));
    if hub_token.is_none() {
        warn!("no hub token found; private repos will fail to download");
    }
    let client = HubClient::new(&args.base_url, hub_token)?;

    let remote = client.list_files(&args.repo_id, &args.revision).await?;
    if remote.is_empty() {
        warn!("{} has no files at revision {}", args.repo_id, args.revision);
        return Ok(ExitCode::SUCCESS);
    }
    let total_bytes: u64 = remote.iter().map(|f| f.size).sum();

    info!(
        "downloading snapshot of {} ({} file(s)) into {}",
        args.repo_id,
        remote.len(),
        args.out.display()
    );

    let bars = TransferBars::new(total_bytes);
    let outcome = transfer::download_snapshot(
        &client,
        &args.repo_id,
        &args.revision,
        &remote,
        &args.out,
        |file, idx, total| bars.begin_file(file.basename(), file.size, idx, total),
    )
    .await?;
    bars.finish();

    for path in &outcome.skipped {
        info!("kept existing {path}");
    }
    success!(
        "fetched {} file(s), kept {} already present",
        outcome.fetched.len(),
        outcome.skipped.len()
    );
    Ok(ExitCode::SUCCESS)
}
