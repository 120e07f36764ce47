use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use salewatch::adapter::magiceden::MagicEdenClient;
use salewatch::app::{Coordinator, Runner, TrackingPlan};
use salewatch::config::Config;
use salewatch::port::LogSink;

#[derive(Parser, Debug)]
#[command(name = "salewatch", about = "NFT sale notifier driven by marketplace stats polling")]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = "salewatch.toml")]
    config: PathBuf,

    /// Run a single poll cycle and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = if args.config.exists() {
        match Config::load(&args.config) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config from {}: {err}", args.config.display());
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };
    config.init_logging();

    let registry = match config.registry() {
        Ok(registry) => registry,
        Err(err) => {
            error!(error = %err, "Invalid subscriber configuration");
            std::process::exit(1);
        }
    };
    let plan = TrackingPlan::from_registry(&registry);
    if plan.is_empty() {
        warn!("No tracked collections configured, nothing to poll");
    }

    let provider = Arc::new(MagicEdenClient::from_config(&config.network, &config.fetch));
    let coordinator = Coordinator::from_config(
        provider,
        Arc::new(LogSink),
        &config.poller,
        &config.dedup,
    );
    let runner = Runner::new(
        coordinator,
        plan,
        Duration::from_secs(config.poller.interval_secs),
    );

    info!(
        api_url = %config.network.api_url,
        chain = %config.network.chain,
        interval_secs = config.poller.interval_secs,
        "Starting salewatch"
    );

    if args.once {
        let report = runner.run_once().await;
        info!(
            emitted = report.emitted.len(),
            delivered = report.delivered,
            errors = report.errors.len(),
            "Single cycle finished"
        );
        return;
    }

    tokio::select! {
        () = runner.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping");
        }
    }
}
