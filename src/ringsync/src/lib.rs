#[macro_use]
extern crate log;

mod config;
pub use config::{Config, ConfigError, RingSyncCli};

mod staging;
pub use staging::{STAGED_FILE_NAME, SourceError, StagedExport};

mod sink;
pub use sink::{DeliveryError, MetricSink, SinkPoint, SinkValue};

mod influx;
pub use influx::{InfluxConfig, InfluxSink};

mod delivery;
pub use delivery::{Delivery, DeliveryReport, PointOutcome};

mod monitor;
pub use monitor::{PollOutcome, SyncJob, SyncMonitor, SyncState};

mod pipeline;
pub use pipeline::{SyncOutcome, SyncPipeline};

#[cfg(test)]
mod testing;
