use async_trait::async_trait;
use ringsync_algos::SourceTable;
use ringsync_entities::battery_level::{Column, Entity};
use ringsync_types::{DeviceSet, Observation, tags};

use super::{MetricExtractor, built, lookup, range_query, timestamp_nanos};
use crate::{ExportDatabase, ExtractionError, ExtractionWindow};

/// Battery levels, tagged with the battery index for devices that have a
/// charging case or more than one cell. `BATTERY_LEVEL` is stamped in
/// seconds, unlike the ring's own tables.
pub struct BatteryExtractor;

#[async_trait]
impl MetricExtractor for BatteryExtractor {
    fn metric(&self) -> &'static str {
        "Battery level"
    }

    fn table(&self) -> SourceTable {
        SourceTable::BatteryLevel
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
                let observation = Observation::builder(device, timestamp_nanos(table, row.timestamp))
                    .field("battery_level", row.level)
                    .tag(tags::BATTERY, row.battery_index)
                    .build();
                debug!("Extracted battery level: {observation:?}");
                built(table, observation)
            })
            .collect())
    }
}
