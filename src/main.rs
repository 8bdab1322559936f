//! hvctl - Hyper-V machines over SSH
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use hvctl::cli::{commands, Cli, Commands};
use hvctl::config::ConfigManager;
use hvctl::error::HvResult;
use hvctl::ui;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> HvResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = config_manager.load().await?;
    cli.apply_overrides(&mut config);

    init_logging(cli.verbose, &config.general.log_format);
    ui::init_theme();

    match cli.command {
        Commands::List(args) => commands::list(args, &config).await,
        Commands::Ls(args) => commands::list(args.into(), &config).await,
        Commands::Snaps(args) => commands::snaps(args, &config).await,
        Commands::Create(args) => commands::create(args, &config).await,
        Commands::Restore(args) => commands::restore(args, &config).await,
        Commands::Delete(args) => commands::delete(args, &config).await,
        Commands::Start(args) => commands::start(args, &config).await,
        Commands::Stop(args) => commands::stop(args, &config).await,
        Commands::Pause(args) => commands::pause(args, &config).await,
        Commands::Resume(args) => commands::resume(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
        Commands::Completions { shell } => commands::completions(shell).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug; always to stderr
fn init_logging(verbose: u8, format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("hvctl=warn"),
        1 => EnvFilter::new("hvctl=info"),
        _ => EnvFilter::new("hvctl=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
