//! One extractor per metric family. Each reads its table over the run's
//! window for the selected devices and yields observations in ascending
//! source-timestamp order.

use async_trait::async_trait;
use ringsync_algos::SourceTable;
use ringsync_types::{Device, DeviceId, DeviceSet, Observation, ObservationError};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{ExportDatabase, ExtractionError, ExtractionWindow};

mod activity;
pub use activity::{ACTIVITY_NOT_RECORDED, ActivityExtractor};

mod battery;
pub use battery::BatteryExtractor;

mod heart_rate;
pub use heart_rate::{HEART_RATE_UPPER_BOUND, HeartRateExtractor, is_valid_heart_rate};

mod hrv;
pub use hrv::HrvExtractor;

mod sleep;
pub use sleep::{SleepSessionExtractor, SleepStageExtractor};

mod spo2;
pub use spo2::Spo2Extractor;

mod stress;
pub use stress::StressExtractor;

#[async_trait]
pub trait MetricExtractor: Send + Sync {
    /// Human readable metric name used in log lines.
    fn metric(&self) -> &'static str;

    fn table(&self) -> SourceTable;

    /// An empty result is not an error; only an unreadable table is.
    async fn extract(
        &self,
        db: &ExportDatabase,
        devices: &DeviceSet,
        window: &ExtractionWindow,
    ) -> Result<Vec<Observation>, ExtractionError>;
}

/// Every extractor, in the order a run executes them.
pub fn all() -> Vec<Box<dyn MetricExtractor>> {
    vec![
        Box::new(StressExtractor),
        Box::new(BatteryExtractor),
        Box::new(SleepSessionExtractor::default()),
        Box::new(SleepStageExtractor),
        Box::new(HrvExtractor),
        Box::new(ActivityExtractor),
        Box::new(Spo2Extractor),
        Box::new(HeartRateExtractor),
    ]
}

/// Rows of `E` at or after the window start for the selected devices,
/// ordered by timestamp.
pub(crate) async fn range_query<E>(
    db: &ExportDatabase,
    table: SourceTable,
    timestamp: E::Column,
    device_id: E::Column,
    devices: &DeviceSet,
    window: &ExtractionWindow,
) -> Result<Vec<E::Model>, ExtractionError>
where
    E: EntityTrait,
{
    E::find()
        .filter(timestamp.gte(window.lower_bound(table)))
        .filter(device_id.is_in(devices.ids()))
        .order_by_asc(timestamp)
        .all(db.connection())
        .await
        .map_err(ExtractionError::unavailable(table))
}

/// Normalizes a `TIMESTAMP` value of `table` to nanoseconds.
pub(crate) fn timestamp_nanos(table: SourceTable, raw: i64) -> i64 {
    table
        .timestamp_unit()
        .map_or(raw, |unit| unit.to_nanos(raw))
}

pub(crate) fn lookup(devices: &DeviceSet, id: i64, table: SourceTable) -> Option<&Device> {
    let device = devices.get(DeviceId(id));
    if device.is_none() {
        warn!("{table}: row for unselected device {id}, skipping");
    }
    device
}

pub(crate) fn built(
    table: SourceTable,
    result: Result<Observation, ObservationError>,
) -> Option<Observation> {
    result
        .inspect_err(|e| warn!("{table}: dropping row: {e}"))
        .ok()
}
