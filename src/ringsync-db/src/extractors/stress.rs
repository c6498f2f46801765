use async_trait::async_trait;
use ringsync_algos::SourceTable;
use ringsync_entities::colmi_stress_sample::{Column, Entity};
use ringsync_types::{DeviceSet, Observation};

use super::{MetricExtractor, built, lookup, range_query, timestamp_nanos};
use crate::{ExportDatabase, ExtractionError, ExtractionWindow};

pub struct StressExtractor;

#[async_trait]
impl MetricExtractor for StressExtractor {
    fn metric(&self) -> &'static str {
        "Stress level"
    }

    fn table(&self) -> SourceTable {
        SourceTable::Stress
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

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let device = lookup(devices, row.device_id, table)?;
                built(
                    table,
                    Observation::builder(device, timestamp_nanos(table, row.timestamp))
                        .field("stress_level", row.stress)
                        .build(),
                )
            })
            .collect())
    }
}
