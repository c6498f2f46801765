use async_trait::async_trait;
use ringsync_algos::SourceTable;
use ringsync_entities::colmi_activity_sample::{Column, Entity, Model};
use ringsync_types::{Device, DeviceSet, Observation, ObservationError, tags};

use super::{MetricExtractor, built, lookup, range_query, timestamp_nanos};
use crate::{ExportDatabase, ExtractionError, ExtractionWindow};

/// Column value the export uses for "not recorded".
pub const ACTIVITY_NOT_RECORDED: i64 = -1;

fn recorded(value: i64) -> Option<i64> {
    (value != ACTIVITY_NOT_RECORDED).then_some(value)
}

pub struct ActivityExtractor;

impl ActivityExtractor {
    /// `None` when the row has nothing recorded.
    fn observation(
        device: &Device,
        row: &Model,
    ) -> Option<Result<Observation, ObservationError>> {
        let steps = recorded(row.steps);
        let calories = recorded(row.calories);
        let distance = recorded(row.distance);
        if steps.is_none() && calories.is_none() && distance.is_none() {
            return None;
        }

        Some(
            Observation::builder(device, timestamp_nanos(SourceTable::Activity, row.timestamp))
                .field_opt("activity_steps", steps)
                .field_opt("activity_calories", calories)
                .field_opt("activity_distance", distance)
                .tag(tags::ACTIVITY_KIND, row.raw_kind)
                .tag(tags::SAMPLE_TYPE, "activity")
                .build(),
        )
    }
}

#[async_trait]
impl MetricExtractor for ActivityExtractor {
    fn metric(&self) -> &'static str {
        "Activity"
    }

    fn table(&self) -> SourceTable {
        SourceTable::Activity
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
            .iter()
            .filter_map(|row| {
                let device = lookup(devices, row.device_id, table)?;
                let Some(observation) = Self::observation(device, row) else {
                    trace!("Activity row at {} has nothing recorded", row.timestamp);
                    return None;
                };
                built(table, observation)
            })
            .inspect(|observation| trace!("Extracted activity: {observation}"))
            .collect())
    }
}
