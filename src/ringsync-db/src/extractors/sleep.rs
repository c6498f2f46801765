use async_trait::async_trait;
use ringsync_algos::{
    SleepBucketer, SleepSession, SourceTable,
    units::{SLEEP_STAGE_DURATION_UNIT, WAKEUP_TIME_UNIT},
};
use ringsync_entities::{colmi_sleep_session_sample, colmi_sleep_stage_sample};
use ringsync_types::{DeviceSet, Observation};

use super::{MetricExtractor, built, lookup, range_query, timestamp_nanos};
use crate::{ExportDatabase, ExtractionError, ExtractionWindow};

/// Expands each sleep session into `time_slept` buckets and a
/// `wakeup_time` marker. Rows that wake up before they start are skipped.
#[derive(Default)]
pub struct SleepSessionExtractor {
    bucketer: SleepBucketer,
}

impl SleepSessionExtractor {
    pub fn new(bucketer: SleepBucketer) -> Self {
        Self { bucketer }
    }
}

#[async_trait]
impl MetricExtractor for SleepSessionExtractor {
    fn metric(&self) -> &'static str {
        "Sleep session"
    }

    fn table(&self) -> SourceTable {
        SourceTable::SleepSession
    }

    async fn extract(
        &self,
        db: &ExportDatabase,
        devices: &DeviceSet,
        window: &ExtractionWindow,
    ) -> Result<Vec<Observation>, ExtractionError> {
        use colmi_sleep_session_sample::{Column, Entity};

        let table = self.table();
        let rows =
            range_query::<Entity>(db, table, Column::Timestamp, Column::DeviceId, devices, window)
                .await?;

        let mut observations = Vec::new();
        for row in rows {
            let Some(device) = lookup(devices, row.device_id, table) else {
                continue;
            };

            let start = timestamp_nanos(table, row.timestamp);
            let wakeup = WAKEUP_TIME_UNIT.to_nanos(row.wakeup_time);
            let session = match SleepSession::new(start, wakeup) {
                Ok(session) => session,
                Err(e) => {
                    warn!("Rejecting sleep session of {}: {e}", device.name);
                    continue;
                }
            };

            match self.bucketer.observations(device, &session) {
                Ok(buckets) => observations.extend(buckets),
                Err(e) => warn!("{table}: dropping session: {e}"),
            }
        }

        Ok(observations)
    }
}

pub struct SleepStageExtractor;

#[async_trait]
impl MetricExtractor for SleepStageExtractor {
    fn metric(&self) -> &'static str {
        "Sleep stage"
    }

    fn table(&self) -> SourceTable {
        SourceTable::SleepStage
    }

    async fn extract(
        &self,
        db: &ExportDatabase,
        devices: &DeviceSet,
        window: &ExtractionWindow,
    ) -> Result<Vec<Observation>, ExtractionError> {
        use colmi_sleep_stage_sample::{Column, Entity};

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
                        .field("sleep_stage", row.stage)
                        .field(
                            "sleep_stage_duration",
                            SLEEP_STAGE_DURATION_UNIT.to_nanos(row.duration),
                        )
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
    use chrono::TimeDelta;

    const MINUTE_MS: i64 = 60_000;

    fn field(obs: &Observation, name: &str) -> Option<i64> {
        obs.field(name).and_then(|v| v.as_i64())
    }

    #[tokio::test]
    async fn session_expands_into_buckets() {
        let db = fixtures::populated_db().await;
        let devices = db.find_devices("Colmi").await.unwrap();
        let obs = SleepSessionExtractor::default()
            .extract(&db, &devices, &ExtractionWindow::since(0))
            .await
            .unwrap();

        let slept = obs
            .iter()
            .filter_map(|o| field(o, "time_slept"))
            .collect::<Vec<_>>();
        assert_eq!(slept, vec![900_000, 900_000, 900_000, 300_000]);

        let wakeup = (BASE_MILLIS + 50 * MINUTE_MS) * 1_000_000;
        let marker = obs.last().unwrap();
        assert_eq!(marker.timestamp(), wakeup);
        assert_eq!(field(marker, "wakeup_time"), Some(wakeup));
        assert!(obs.iter().all(|o| o.tag("device") == Some("Colmi R02_1A2B")));
    }

    #[tokio::test]
    async fn invalid_session_is_skipped_but_others_continue() {
        let db = fixtures::export_db().await;
        fixtures::insert_device(&db, 1, "Colmi R02").await;
        fixtures::insert_sleep_sessions(
            &db,
            &[
                (BASE_MILLIS, 1, BASE_MILLIS - MINUTE_MS),
                (BASE_MILLIS + 10 * MINUTE_MS, 1, BASE_MILLIS + 10 * MINUTE_MS),
                (BASE_MILLIS + 20 * MINUTE_MS, 1, BASE_MILLIS + 40 * MINUTE_MS),
            ],
        )
        .await;
        let devices = db.find_devices("Colmi").await.unwrap();

        let obs = SleepSessionExtractor::default()
            .extract(&db, &devices, &ExtractionWindow::since(0))
            .await
            .unwrap();

        let markers = obs
            .iter()
            .filter(|o| o.field("wakeup_time").is_some())
            .count();
        assert_eq!(markers, 2);
        let slept = obs
            .iter()
            .filter_map(|o| field(o, "time_slept"))
            .collect::<Vec<_>>();
        assert_eq!(slept, vec![900_000, 300_000]);
    }

    #[tokio::test]
    async fn custom_bucket_width() {
        let db = fixtures::export_db().await;
        fixtures::insert_device(&db, 1, "Colmi R02").await;
        fixtures::insert_sleep_sessions(&db, &[(BASE_MILLIS, 1, BASE_MILLIS + 50 * MINUTE_MS)])
            .await;
        let devices = db.find_devices("Colmi").await.unwrap();

        let extractor = SleepSessionExtractor::new(SleepBucketer::new(TimeDelta::minutes(30)));
        let obs = extractor
            .extract(&db, &devices, &ExtractionWindow::since(0))
            .await
            .unwrap();
        let slept = obs
            .iter()
            .filter_map(|o| field(o, "time_slept"))
            .collect::<Vec<_>>();
        assert_eq!(slept, vec![1_800_000, 1_200_000]);
    }

    #[tokio::test]
    async fn stage_duration_minutes_to_nanos() {
        let db = fixtures::populated_db().await;
        let devices = db.find_devices("Colmi").await.unwrap();
        let obs = SleepStageExtractor
            .extract(&db, &devices, &ExtractionWindow::since(0))
            .await
            .unwrap();

        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].timestamp(), BASE_MILLIS * 1_000_000);
        assert_eq!(field(&obs[0], "sleep_stage"), Some(2));
        assert_eq!(
            field(&obs[0], "sleep_stage_duration"),
            Some(20 * 60 * 1_000_000_000)
        );
    }
}
