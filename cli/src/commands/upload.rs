use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use hangar_common::bytes::human_bytes;
use hangar_common::config::Config;
use hangar_common::token::{self, DEFAULT_TOKEN_ENV, DEFAULT_TOKEN_FILE};
use hangar_common::{artifacts, error, info, success, warn};
use hangar_hub::client::{DEFAULT_BASE_URL, HubClient};
use hangar_hub::transfer::{self, DEFAULT_MAX_RETRIES};

use crate::terminal::progress::TransferBars;

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Hub repo id (e.g. org/aurora-models)
    #[arg(long)]
    pub repo_id: String,
    /// Root path to search for model artifacts
    #[arg(long, default_value = "models")]
    pub path: PathBuf,
    /// Branch to upload to
    #[arg(long, default_value = "main")]
    pub revision: String,
    /// Max upload attempts per file
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,
    /// List the files and total size, then exit without uploading
    #[arg(long)]
    pub dry_run: bool,
    /// Skip files whose basename already exists in the hub repo
    #[arg(long)]
    pub resume: bool,
    /// Environment variable holding the hub token
    #[arg(long, default_value = DEFAULT_TOKEN_ENV)]
    pub token_env: String,
    /// Hub endpoint override, for mirrors
    #[arg(long, default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,
}

pub async fn upload(args: UploadArgs, _cfg: &Config) -> anyhow::Result<ExitCode> {
    let found = artifacts::find_artifacts(&args.path)?;
    if found.is_empty() {
        warn!("no model artifacts under {}", args.path.display());
        return Ok(ExitCode::SUCCESS);
    }

    if args.dry_run {
        info!(
            "dry-run: {} artifact file(s), {} total",
            found.len(),
            human_bytes(artifacts::total_bytes(&found))
        );
        for file in &found {
            info!("  {} ({})", file.path.display(), human_bytes(file.size));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let hub_token = token::resolve(&args.token_env, Path::new(DEFAULT_TOKEN_FILE))?;
    let client = HubClient::new(&args.base_url, Some(hub_token))?;

    match client.create_repo(&args.repo_id).await {
        Ok(true) => info!("created private repo {}", args.repo_id),
        Ok(false) => {}
        Err(err) => warn!("could not create repo (it may already exist): {err}"),
    }

    let remote = if args.resume {
        Some(client.list_files(&args.repo_id, &args.revision).await?)
    } else {
        None
    };

    let plan = transfer::plan_upload(found, remote.as_deref());
    for file in &plan.skipped {
        info!("skipping {} (already on the hub)", file.basename());
    }
    if plan.files.is_empty() {
        success!("everything is already uploaded");
        return Ok(ExitCode::SUCCESS);
    }

    info!(
        "uploading {} file(s), {} total",
        plan.files.len(),
        human_bytes(plan.total_bytes())
    );

    let bars = TransferBars::new(plan.total_bytes());
    let outcome = transfer::upload(
        &client,
        &args.repo_id,
        &args.revision,
        &plan,
        args.max_retries,
        |file, idx, total| bars.begin_file(file.basename(), file.size, idx, total),
    )
    .await?;
    bars.finish();

    success!("uploaded {} file(s)", outcome.uploaded.len());
    if !outcome.failed.is_empty() {
        for name in &outcome.failed {
            error!("failed: {name}");
        }
        anyhow::bail!("{} upload(s) failed", outcome.failed.len());
    }
    Ok(ExitCode::SUCCESS)
}
