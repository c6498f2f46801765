#[macro_use]
extern crate log;

use clap::Parser;
use dotenv::dotenv;
use ringsync::{Config, InfluxSink, RingSyncCli, SyncMonitor, SyncPipeline};
use tokio_util::sync::CancellationToken;

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .filter_module("sqlx::query", log::LevelFilter::Off)
        .filter_module("sea_orm::driver", log::LevelFilter::Warn)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_result = dotenv();

    let cli = RingSyncCli::parse();
    init_logging(cli.debug);
    if let Err(error) = dotenv_result {
        debug!("No .env loaded: {}", error);
    }

    let config = Config::from_cli(cli)?;
    config.check_export_directory()?;
    if config.retain_staged_export {
        info!("Staged copies of the export will be kept");
    }

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Shutdown requested");
        handler_token.cancel();
    })?;

    let sink = InfluxSink::new(&config.influx)?;
    let pipeline = SyncPipeline::new(&config, sink);

    if config.run_now {
        info!("Starting sync job immediately...");
        if let Err(error) = pipeline.run_once(&cancel).await {
            error!("Sync job failed: {error:#}");
        }
        return Ok(());
    }

    let mut monitor = SyncMonitor::new(&config.export_path, config.poll_interval);
    monitor.run(&pipeline, &cancel).await;

    Ok(())
}
