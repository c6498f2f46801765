use async_trait::async_trait;
use ringsync_algos::SourceTable;
use ringsync_entities::colmi_heart_rate_sample::{Column, Entity};
use ringsync_types::{DeviceSet, Observation, tags};

use super::{MetricExtractor, built, lookup, range_query, timestamp_nanos};
use crate::{ExportDatabase, ExtractionError, ExtractionWindow};

/// Readings at or above this value are sensor error codes.
pub const HEART_RATE_UPPER_BOUND: i64 = 254;

pub fn is_valid_heart_rate(bpm: i64) -> bool {
    bpm > 0 && bpm < HEART_RATE_UPPER_BOUND
}

pub struct HeartRateExtractor;

#[async_trait]
impl MetricExtractor for HeartRateExtractor {
    fn metric(&self) -> &'static str {
        "Heart rate"
    }

    fn table(&self) -> SourceTable {
        SourceTable::HeartRate
    }

    async fn extract(
        &self,
        db: &ExportDatabase,
        devices: &DeviceSet,
        window: &ExtractionWindow,
    ) -> Result<Vec<Observation>, ExtractionError> {
        let table = self.table();
        let rows =
            range_query::<Entity>(db, table, Column::Timestamp, Column::DeviceId, devices, window)
                .await?;

        let total = rows.len();
        let observations = rows
            .into_iter()
            .filter(|row| is_valid_heart_rate(row.heart_rate))
            .filter_map(|row| {
                let device = lookup(devices, row.device_id, table)?;
                built(
                    table,
                    Observation::builder(device, timestamp_nanos(table, row.timestamp))
                        .field("heart_rate", row.heart_rate)
                        .tag(tags::SAMPLE_TYPE, "periodic_samples")
                        .build(),
                )
            })
            .collect::<Vec<_>>();

        if observations.len() < total {
            debug!(
                "Dropped {} out-of-range heart rate readings",
                total - observations.len()
            );
        }

        Ok(observations)
    }
}
