use async_trait::async_trait;
use ringsync_algos::SourceTable;
use ringsync_entities::colmi_spo2_sample::{Column, Entity};
use ringsync_types::{DeviceSet, Observation};

use super::{MetricExtractor, built, lookup, range_query, timestamp_nanos};
use crate::{ExportDatabase, ExtractionError, ExtractionWindow};

pub struct Spo2Extractor;

#[async_trait]
impl MetricExtractor for Spo2Extractor {
    fn metric(&self) -> &'static str {
        "SpO2"
    }

    fn table(&self) -> SourceTable {
        SourceTable::Spo2
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
                        .field("spo2", row.spo2)
                        .build(),
                )
            })
            .collect())
    }
}
