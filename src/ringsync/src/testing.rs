//! Sinks and export files shared by the tests of this crate.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use ringsync_entities::{
    battery_level, colmi_activity_sample, colmi_heart_rate_sample, colmi_hrv_value_sample,
    colmi_sleep_session_sample, colmi_sleep_stage_sample, colmi_spo2_sample, colmi_stress_sample,
    device,
};
use sea_orm::{ActiveValue::Set, ConnectionTrait, Database, EntityTrait, Schema};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::{Config, DeliveryError, InfluxConfig, MetricSink, SinkPoint};

#[derive(Default)]
pub struct RecordingSink {
    points: Mutex<Vec<SinkPoint>>,
    calls: AtomicUsize,
    fail_on: HashSet<usize>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingSink {
    /// Rejects the writes at the given zero-based call indices.
    pub fn failing_on(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_on: indices.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Cancels `token` once `writes` calls have been made.
    pub fn cancel_after(mut self, writes: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((writes, token));
        self
    }

    pub fn points(&self) -> Vec<SinkPoint> {
        self.points.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricSink for RecordingSink {
    async fn write(&self, point: &SinkPoint) -> Result<(), DeliveryError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((writes, token)) = &self.cancel_after {
            if idx + 1 >= *writes {
                token.cancel();
            }
        }

        if self.fail_on.contains(&idx) {
            return Err(DeliveryError::Rejected {
                status: 500,
                body: "internal error".into(),
            });
        }

        self.points.lock().unwrap().push(point.clone());
        Ok(())
    }
}

/// An export written to a temporary directory that lives as long as this
/// value.
pub struct ExportFile {
    _dir: TempDir,
    path: PathBuf,
}

impl ExportFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A ring and a band, each with recent heart rate readings.
pub async fn export_file() -> ExportFile {
    export_file_with(&[(1, "Colmi R02_1A2B"), (2, "Mi Band 8")]).await
}

pub async fn export_file_with(devices: &[(i64, &str)]) -> ExportFile {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gadgetbridge.db");
    write_export(&path, devices).await;
    ExportFile { _dir: dir, path }
}

/// Two readings for device 1 and one for device 2, an hour old.
pub async fn write_export(path: &Path, devices: &[(i64, &str)]) {
    let db = Database::connect(format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .unwrap();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let tables = [
        schema.create_table_from_entity(device::Entity),
        schema.create_table_from_entity(colmi_stress_sample::Entity),
        schema.create_table_from_entity(battery_level::Entity),
        schema.create_table_from_entity(colmi_sleep_session_sample::Entity),
        schema.create_table_from_entity(colmi_sleep_stage_sample::Entity),
        schema.create_table_from_entity(colmi_hrv_value_sample::Entity),
        schema.create_table_from_entity(colmi_activity_sample::Entity),
        schema.create_table_from_entity(colmi_spo2_sample::Entity),
        schema.create_table_from_entity(colmi_heart_rate_sample::Entity),
    ];
    for table in tables {
        db.execute(backend.build(&table)).await.unwrap();
    }

    let devices = devices.iter().map(|&(id, name)| device::ActiveModel {
        id: Set(id),
        name: Set(name.to_owned()),
    });
    device::Entity::insert_many(devices)
        .exec_without_returning(&db)
        .await
        .unwrap();

    let start = (Utc::now() - TimeDelta::hours(1)).timestamp_millis();
    let readings = [(start, 1, 64), (start + 60_000, 1, 72), (start, 2, 70)];
    let readings = readings
        .into_iter()
        .map(|(timestamp, device_id, heart_rate)| colmi_heart_rate_sample::ActiveModel {
            timestamp: Set(timestamp),
            device_id: Set(device_id),
            heart_rate: Set(heart_rate),
        });
    colmi_heart_rate_sample::Entity::insert_many(readings)
        .exec_without_returning(&db)
        .await
        .unwrap();

    db.close().await.unwrap();
}

pub fn config(export_path: &Path) -> Config {
    Config {
        export_path: export_path.to_path_buf(),
        run_now: false,
        debug: false,
        lookback: TimeDelta::seconds(86_400),
        poll_interval: Duration::from_millis(10),
        device_pattern: "Colmi".into(),
        retain_staged_export: false,
        influx: InfluxConfig {
            url: "http://localhost:8086".into(),
            token: "token".into(),
            org: String::new(),
            bucket: "health".into(),
            measurement: "smart_ring".into(),
        },
    }
}
