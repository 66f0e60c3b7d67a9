pub mod check;
pub mod download;
pub mod monitor;
pub mod publish;
pub mod scrub;
pub mod upload;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hangar", version)]
#[command(about = "Operator tooling for repositories that park large model artifacts.")]
pub struct CommandLine {
    /// Lower the output volume (repeat to keep only warnings and errors)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,
    /// Skip the startup banner
    #[arg(long, global = true)]
    pub no_banner: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commit and push, refusing when artifacts or secrets are tracked
    #[command(alias = "p")]
    Publish(publish::PublishArgs),
    /// Rewrite history to drop artifact paths, behind a full mirror backup
    #[command(alias = "x")]
    Scrub(scrub::ScrubArgs),
    /// Upload local model artifacts to the hub
    #[command(alias = "u")]
    Upload(upload::UploadArgs),
    /// Download a repo snapshot from the hub
    #[command(alias = "d")]
    Download(download::DownloadArgs),
    /// Watch upload progress by comparing local and remote sizes
    #[command(alias = "m")]
    Monitor(monitor::MonitorArgs),
    /// Inspect local model folders before publishing
    #[command(alias = "c")]
    Check(check::CheckArgs),
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
