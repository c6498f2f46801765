use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::TimeDelta;
use clap::Parser;
use thiserror::Error;

use crate::InfluxConfig;

/// Raw command line and environment settings. Validated into [`Config`].
#[derive(Parser, Debug)]
#[command(about = "Sync smart ring stats from a Gadgetbridge export into InfluxDB")]
pub struct RingSyncCli {
    /// Start the process immediately instead of waiting for a file update
    #[arg(long)]
    pub now: bool,
    /// Print detailed debug information
    #[arg(long)]
    pub debug: bool,
    /// Path of the Gadgetbridge export to watch
    #[arg(env, long)]
    pub local_path: Option<PathBuf>,
    /// How far back to query, in seconds
    #[arg(env, long, default_value_t = 86_400)]
    pub query_duration: u64,
    #[arg(env, long)]
    pub influxdb_url: Option<String>,
    #[arg(env, long)]
    pub influxdb_token: Option<String>,
    #[arg(env, long, default_value = "")]
    pub influxdb_org: String,
    #[arg(env, long)]
    pub influxdb_measurement: Option<String>,
    #[arg(env, long)]
    pub influxdb_bucket: Option<String>,
    /// `N` keeps the staged copy of the export for debugging
    #[arg(env, long, default_value = "Y")]
    pub remove_temp_db: String,
    /// Case-sensitive substring a device name must contain
    #[arg(env, long, default_value = "Colmi")]
    pub device_name_pattern: String,
    /// Seconds between checks of the export's modification time
    #[arg(env, long, default_value_t = 1)]
    pub poll_interval: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set in environment")]
    Missing(&'static str),
    #[error("REMOVE_TEMP_DB must be Y or N, got `{0}`")]
    InvalidRemoveTempDb(String),
    #[error("QUERY_DURATION of {0}s is out of range")]
    InvalidQueryDuration(u64),
    #[error("POLL_INTERVAL must be at least one second")]
    InvalidPollInterval,
    #[error("directory {} does not exist", .0.display())]
    MissingDirectory(PathBuf),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub export_path: PathBuf,
    pub run_now: bool,
    pub debug: bool,
    pub lookback: TimeDelta,
    pub poll_interval: Duration,
    pub device_pattern: String,
    pub retain_staged_export: bool,
    pub influx: InfluxConfig,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

impl Config {
    pub fn from_cli(cli: RingSyncCli) -> Result<Self, ConfigError> {
        let influx = InfluxConfig {
            url: required(cli.influxdb_url, "INFLUXDB_URL")?,
            token: required(cli.influxdb_token, "INFLUXDB_TOKEN")?,
            org: cli.influxdb_org,
            bucket: required(cli.influxdb_bucket, "INFLUXDB_BUCKET")?,
            measurement: required(cli.influxdb_measurement, "INFLUXDB_MEASUREMENT")?,
        };

        let export_path = cli
            .local_path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("LOCAL_PATH"))?;

        let retain_staged_export = match cli.remove_temp_db.to_ascii_uppercase().as_str() {
            "Y" => false,
            "N" => true,
            _ => return Err(ConfigError::InvalidRemoveTempDb(cli.remove_temp_db)),
        };

        let lookback = i64::try_from(cli.query_duration)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or(ConfigError::InvalidQueryDuration(cli.query_duration))?;

        if cli.poll_interval == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }

        Ok(Self {
            export_path,
            run_now: cli.now,
            debug: cli.debug,
            lookback,
            poll_interval: Duration::from_secs(cli.poll_interval),
            device_pattern: cli.device_name_pattern,
            retain_staged_export,
            influx,
        })
    }

    /// The directory holding the export must exist even when the export
    /// itself has not been written yet.
    pub fn check_export_directory(&self) -> Result<(), ConfigError> {
        let dir = match self.export_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        if dir.is_dir() {
            Ok(())
        } else {
            Err(ConfigError::MissingDirectory(dir.to_path_buf()))
        }
    }
}
