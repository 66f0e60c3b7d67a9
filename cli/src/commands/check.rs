use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use colored::*;
use hangar_common::bytes::human_bytes;
use hangar_common::config::Config;
use hangar_common::{success, warn};
use hangar_core::inventory;

use crate::terminal::print;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Models root to inspect
    #[arg(long, default_value = "models")]
    pub path: PathBuf,
    /// Emit the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn check(args: CheckArgs, _cfg: &Config) -> anyhow::Result<ExitCode> {
    let report = inventory::scan(&args.path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if report.models.is_empty() {
            warn!("no model folders under {}", args.path.display());
        }
        for (idx, entry) in report.models.iter().enumerate() {
            print::tree_head(idx, &entry.name);
            print::as_tree_one_level(vec![
                ("files".to_string(), entry.files.to_string().normal()),
                ("size".to_string(), human_bytes(entry.total_bytes).normal()),
                ("weights".to_string(), flag(entry.has_weights)),
                ("tokenizer".to_string(), flag(entry.has_tokenizer)),
            ]);
        }
    }

    if report.healthy() {
        if !args.json {
            success!("{} model folder(s) look complete", report.models.len());
        }
        Ok(ExitCode::SUCCESS)
    } else {
        if !args.json {
            let broken: Vec<&str> = report
                .models
                .iter()
                .filter(|m| !m.has_weights)
                .map(|m| m.name.as_str())
                .collect();
            warn!("missing weight files: {}", broken.join(", "));
        }
        Ok(ExitCode::from(2))
    }
}

fn flag(present: bool) -> ColoredString {
    if present {
        "yes".green()
    } else {
        "missing".red().bold()
    }
}
