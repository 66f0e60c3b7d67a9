use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use hangar_common::bytes::human_bytes;
use hangar_common::config::Config;
use hangar_common::token::{self, DEFAULT_TOKEN_ENV, DEFAULT_TOKEN_FILE};
use hangar_common::{artifacts, info, warn};
use hangar_hub::client::{DEFAULT_BASE_URL, HubClient};
use hangar_hub::monitor;

#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// Hub repo id (e.g. org/aurora-models)
    #[arg(long)]
    pub repo_id: String,
    /// Local models root to compare against
    #[arg(long, default_value = "models")]
    pub local: PathBuf,
    /// Branch to compare against
    #[arg(long, default_value = "main")]
    pub revision: String,
    /// Polling interval in seconds
    #[arg(long, default_value_t = 30)]
    pub interval: u64,
    /// Print a single snapshot and exit
    #[arg(long)]
    pub once: bool,
    /// Environment variable holding the hub token
    #[arg(long, default_value = DEFAULT_TOKEN_ENV)]
    pub token_env: String,
    /// Hub endpoint override, for mirrors
    #[arg(long, default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,
}

pub async fn monitor(args: MonitorArgs, _cfg: &Config) -> anyhow::Result<ExitCode> {
    let hub_token = token::resolve_optional(&args.token_env, Path::new(DEFAULT_TOKEN_FILE));
    let client = HubClient::new(&args.base_url, hub_token)?;

    loop {
        let local = artifacts::find_artifacts(&args.local)?;
        let remote = match client.list_files(&args.repo_id, &args.revision).await {
            Ok(remote) => remote,
            Err(err) => {
                warn!("could not list remote files: {err}");
                Vec::new()
            }
        };

        let snap = monitor::compare(&local, &remote);
        info!(
            "local {} | remote {} | {:.1}% complete | remaining {} | matched {}/{}",
            human_bytes(snap.local_bytes),
            human_bytes(snap.remote_bytes),
            snap.percent(),
            human_bytes(snap.remaining_bytes()),
            snap.files_matched,
            snap.files_total
        );

        if args.once {
            break;
        }
        tokio::time::sleep(Duration::from_secs(args.interval)).await;
    }

    Ok(ExitCode::SUCCESS)
}
