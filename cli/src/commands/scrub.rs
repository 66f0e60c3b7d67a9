use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use hangar_common::config::Config;
use hangar_common::{info, success, warn};
use hangar_core::publish::DEFAULT_DISALLOWED;
use hangar_core::scrub::{self, ScrubRequest};

#[derive(Args, Debug, Clone)]
pub struct ScrubArgs {
    /// Repository whose history will be rewritten
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,
    /// Path prefixes to drop from all commits (defaults to the disallowed set)
    #[arg(long = "path", value_name = "PREFIX")]
    pub paths: Vec<String>,
    /// Where to put the mirror backup (default: sibling <repo>-backup.git)
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,
    /// Where to put the rewritten clone (default: sibling <repo>-rewrite)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,
}

pub fn scrub(args: ScrubArgs, _cfg: &Config) -> anyhow::Result<ExitCode> {
    let paths = if args.paths.is_empty() {
        DEFAULT_DISALLOWED.iter().map(|s| s.to_string()).collect()
    } else {
        args.paths.clone()
    };

    let report = scrub::run(&ScrubRequest {
        repo_dir: args.repo.clone(),
        paths,
        backup_dir: args.backup_dir.clone(),
        work_dir: args.work_dir.clone(),
    })?;

    success!("mirror backup at {}", report.backup_dir.display());
    success!("rewritten clone at {}", report.work_dir.display());
    info!("next steps, all manual on purpose:");
    info!("  1. inspect the rewritten history in {}", report.work_dir.display());
    info!("  2. when satisfied: git push --force --all && git push --force --tags");
    warn!("nothing has been pushed; the force push is yours to run");

    Ok(ExitCode::SUCCESS)
}
