use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use ringsync_db::{ExportDatabase, ExtractionEngine, ExtractionError, ExtractionWindow};
use tokio_util::sync::CancellationToken;

use crate::{Config, Delivery, DeliveryReport, MetricSink, StagedExport, SyncJob};

/// How a single sync run ended when it did not fail outright.
#[derive(Debug)]
pub enum SyncOutcome {
    Delivered(DeliveryReport),
    /// Extraction produced nothing to deliver; the sink was not contacted.
    Skipped(ExtractionError),
    Cancelled,
}

/// Stage, extract and deliver, once per call.
pub struct SyncPipeline<'a, S> {
    config: &'a Config,
    engine: ExtractionEngine,
    delivery: Delivery<S>,
}

impl<'a, S: MetricSink> SyncPipeline<'a, S> {
    pub fn new(config: &'a Config, sink: S) -> Self {
        Self {
            config,
            engine: ExtractionEngine::new(config.device_pattern.as_str()),
            delivery: Delivery::new(sink, config.influx.measurement.as_str()),
        }
    }

    pub fn delivery(&self) -> &Delivery<S> {
        &self.delivery
    }

    pub async fn run_once(&self, cancel: &CancellationToken) -> anyhow::Result<SyncOutcome> {
        let staged = StagedExport::stage(
            &self.config.export_path,
            self.config.retain_staged_export,
        )
        .await
        .context("Unable to fetch database")?;

        let outcome = self.extract_and_deliver(staged.database(), cancel).await;
        staged.close().await;
        Ok(outcome)
    }

    async fn extract_and_deliver(
        &self,
        db: &ExportDatabase,
        cancel: &CancellationToken,
    ) -> SyncOutcome {
        let window = ExtractionWindow::ending_at(Utc::now(), self.config.lookback);
        let extraction = match self.engine.run(db, &window, cancel).await {
            Ok(extraction) => extraction,
            Err(ExtractionError::Cancelled) => {
                info!("Sync cancelled during extraction");
                return SyncOutcome::Cancelled;
            }
            Err(error) => {
                warn!("Data extraction failed: {error}");
                return SyncOutcome::Skipped(error);
            }
        };

        info!(
            "Extracted {} data points for {} device(s)",
            extraction.observations.len(),
            extraction.devices.len()
        );

        let report = self.delivery.deliver(&extraction.observations, cancel).await;
        info!("{report}");
        if report.cancelled {
            info!("Sync cancelled during delivery");
        }
        SyncOutcome::Delivered(report)
    }
}

#[async_trait]
impl<S: MetricSink> SyncJob for SyncPipeline<'_, S> {
    async fn run(&self, cancel: &CancellationToken) -> anyhow::Result<()> {
        self.run_once(cancel).await.map(|_| ())
    }
}
