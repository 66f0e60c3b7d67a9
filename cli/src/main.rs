mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, check, download, monitor, publish, scrub, upload};
use hangar_common::config::Config;
use hangar_core::publish::PublishError;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init(commands.quiet);
    print::banner(commands.no_banner, commands.quiet);

    let cfg = Config {
        quiet: commands.quiet,
        no_banner: commands.no_banner,
    };

    let result = match commands.command {
        Commands::Publish(args) => {
            print::header("guarded publish", cfg.quiet);
            publish::publish(args, &cfg)
        }
        Commands::Scrub(args) => {
            print::header("history scrub", cfg.quiet);
            scrub::scrub(args, &cfg)
        }
        Commands::Upload(args) => {
            print::header("hub upload", cfg.quiet);
            upload::upload(args, &cfg).await
        }
        Commands::Download(args) => {
            print::header("hub download", cfg.quiet);
            download::download(args, &cfg).await
        }
        Commands::Monitor(args) => {
            print::header("upload monitor", cfg.quiet);
            monitor::monitor(args, &cfg).await
        }
        Commands::Check(args) => {
            print::header("artifact check", cfg.quiet);
            check::check(args, &cfg)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            let code = err
                .downcast_ref::<PublishError>()
                .map(|e| e.exit_code())
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}
