use std::ffi::OsString;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::{Command, ExitCode, Stdio};

use clap::Args;
use hangar_common::config::Config;
use hangar_common::success;
use hangar_core::publish::{
    self, DEFAULT_DISALLOWED, DEFAULT_LOG_FILE, PublishOutcome, PublishRequest,
};

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// Repository to publish
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,
    /// Commit message
    #[arg(short, long, default_value = "sync local changes")]
    pub message: String,
    /// Remote to push to
    #[arg(long, default_value = "origin")]
    pub remote: String,
    /// Extra disallowed path prefixes (extends models/, checkpoints/, secrets/)
    #[arg(long = "disallow", value_name = "PREFIX")]
    pub disallow: Vec<String>,
    /// Publish log file, relative to the repository
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log: PathBuf,
    /// Run the push in the background, writing all output to the log
    #[arg(long)]
    pub detach: bool,
}

pub fn publish(args: PublishArgs, cfg: &Config) -> anyhow::Result<ExitCode> {
    if args.detach {
        return detach(&args, cfg);
    }

    let mut disallowed: Vec<String> = DEFAULT_DISALLOWED.iter().map(|s| s.to_string()).collect();
    disallowed.extend(args.disallow.iter().cloned());

    let request = PublishRequest {
        repo_dir: args.repo.clone(),
        remote: args.remote.clone(),
        message: args.message.clone(),
        disallowed,
        log_path: args.log.clone(),
    };

    match publish::run(&request)? {
        PublishOutcome::NothingToCommit => {
            success!("working tree clean, nothing to publish");
        }
        PublishOutcome::Pushed { changes } => {
            success!("published {changes} change(s) to '{}'", args.remote);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Argument vector for the detached child: the same invocation minus
/// `--detach`, with the global flags forwarded.
fn detach_args(args: &PublishArgs, quiet: u8) -> Vec<OsString> {
    let mut argv: Vec<OsString> = vec!["--no-banner".into()];
    for _ in 0..quiet {
        argv.push("-q".into());
    }
    argv.extend(["publish".into(), "--repo".into(), args.repo.clone().into()]);
    argv.extend(["--message".into(), args.message.clone().into()]);
    argv.extend(["--remote".into(), args.remote.clone().into()]);
    argv.extend(["--log".into(), args.log.clone().into()]);
    for prefix in &args.disallow {
        argv.extend(["--disallow".into(), prefix.clone().into()]);
    }
    argv
}

/// Re-spawns this publish invocation as a detached child so the push can run
/// unattended; the log file is the only place its output lands.
fn detach(args: &PublishArgs, cfg: &Config) -> anyhow::Result<ExitCode> {
    let log_path = if args.log.is_absolute() {
        args.log.clone()
    } else {
        args.repo.join(&args.log)
    };
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let mut cmd = Command::new(std::env::current_exe()?);
    cmd.args(detach_args(args, cfg.quiet));
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(log.try_clone()?))
        .stderr(Stdio::from(log));
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let child = cmd.spawn()?;
    success!(
        "publish detached (pid {}); follow {} for output",
        child.id(),
        log_path.display()
    );
    Ok(ExitCode::SUCCESS)
}
