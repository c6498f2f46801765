use async_trait::async_trait;
use ringsync_algos::SourceTable;
use ringsync_entities::colmi_hrv_value_sample::{Column, Entity};
use ringsync_types::{DeviceSet, Observation};

use super::{MetricExtractor, built, lookup, range_query, timestamp_nanos};
use crate::{ExportDatabase, ExtractionError, ExtractionWindow};

pub struct HrvExtractor;

#[async_trait]
impl MetricExtractor for HrvExtractor {
    fn metric(&self) -> &'static str {
        "HRV"
    }

    fn table(&self) -> SourceTable {
        SourceTable::Hrv
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
                        .field("hrv_value", row.value)
                        .build(),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, BASE_MILLIS};

    #[tokio::test]
    async fn extracts_hrv() {
        let db = fixtures::populated_db().await;
        let devices = db.find_devices("Colmi").await.unwrap();
        let obs = HrvExtractor
            .extract(&db, &devices, &ExtractionWindow::since(0))
            .await
            .unwrap();

        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].timestamp(), (BASE_MILLIS + 120_000) * 1_000_000);
        assert_eq!(obs[0].field("hrv_value").and_then(|v| v.as_i64()), Some(48));
        assert_eq!(obs[0].tag("device"), Some("Colmi R06_9F00"));
    }
}
