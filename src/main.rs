use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tokio::io::BufReader;
use tracing::{info, warn};

use snaplink::cli::{Cli, Commands, ConfigCommands};
use snaplink::config::StaticConfig;
use snaplink::interfaces::session::Session;
use snaplink::services::LinkService;
use snaplink::system::{StaticReferrer, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config {
            action: ConfigCommands::Generate { output_path },
        }) => generate_config(output_path.as_deref()),
        Some(Commands::Session) | None => run_session(cli.config.as_deref()).await,
    }
}

fn generate_config(output_path: Option<&str>) -> anyhow::Result<()> {
    match output_path {
        Some(path) => {
            StaticConfig::default()
                .save_to_file(path)
                .with_context(|| format!("failed to write {}", path))?;
            println!("{} Sample configuration written to {}", "✓".bold().green(), path);
        }
        None => print!("{}", StaticConfig::generate_sample_config()),
    }
    Ok(())
}

async fn run_session(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = StaticConfig::load(config_path).context("failed to load configuration")?;
    // guard 需要活到进程结束，否则文件日志会丢
    let _guard = init_logging(&config.logging).context("failed to initialize logging")?;

    info!(
        "Starting session (geolocation: {}, base url: {})",
        config.analytics.geolocation, config.shortener.base_url
    );

    let referrer = Arc::new(StaticReferrer::default());
    let service = LinkService::builder(&config)
        .referrer(referrer.clone())
        .build();
    let mut session = Session::new(service, referrer, io::stdout());

    println!(
        "{} Type {} for commands, {} to leave.",
        "snaplink".bold().cyan(),
        "help".bold(),
        "quit".bold()
    );

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = session.run(stdin) => result.context("session I/O failed")?,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!("Failed to listen for Ctrl+C: {}", e);
            }
            println!();
            session.service().shutdown();
        }
    }

    Ok(())
}
