use ringsync_algos::LivenessTracker;
use ringsync_types::{DeviceSet, Observation};
use tokio_util::sync::CancellationToken;

use crate::{
    ExportDatabase, ExtractionError, ExtractionWindow, MetricExtractor, extractors, now_nanos,
};

/// Output of one extraction run.
#[derive(Debug)]
pub struct Extraction {
    pub devices: DeviceSet,
    /// Extractor output in run order, followed by one `sync_check`
    /// observation per device that contributed anything.
    pub observations: Vec<Observation>,
}

pub struct ExtractionEngine {
    device_pattern: String,
    extractors: Vec<Box<dyn MetricExtractor>>,
}

impl ExtractionEngine {
    pub fn new(device_pattern: impl Into<String>) -> Self {
        Self::with_extractors(device_pattern, extractors::all())
    }

    pub fn with_extractors(
        device_pattern: impl Into<String>,
        extractors: Vec<Box<dyn MetricExtractor>>,
    ) -> Self {
        Self {
            device_pattern: device_pattern.into(),
            extractors,
        }
    }

    pub async fn run(
        &self,
        db: &ExportDatabase,
        window: &ExtractionWindow,
        cancel: &CancellationToken,
    ) -> Result<Extraction, ExtractionError> {
        let devices = db.find_devices(&self.device_pattern).await?;
        if devices.is_empty() {
            return Err(ExtractionError::NoTargetDevice {
                pattern: self.device_pattern.clone(),
            });
        }
        info!("Devices found: {devices}");

        let mut observations = Vec::new();
        let mut liveness = LivenessTracker::new();

        for extractor in &self.extractors {
            if cancel.is_cancelled() {
                return Err(ExtractionError::Cancelled);
            }

            debug!("Querying {} data...", extractor.metric().to_lowercase());
            let batch = extractor.extract(db, &devices, window).await?;
            info!("{} data points: {}", extractor.metric(), batch.len());

            liveness.observe_all(&batch);
            observations.extend(batch);
        }

        match liveness.into_observations(&devices, now_nanos()) {
            Ok(checks) => observations.extend(checks),
            Err(e) => warn!("Unable to build sync check: {e}"),
        }

        Ok(Extraction {
            devices,
            observations,
        })
    }
}
