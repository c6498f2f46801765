//! In-memory exports shaped like a Gadgetbridge database.

use ringsync_entities::{
    battery_level, colmi_activity_sample, colmi_heart_rate_sample, colmi_hrv_value_sample,
    colmi_sleep_session_sample, colmi_sleep_stage_sample, colmi_spo2_sample, colmi_stress_sample,
    device,
};
use sea_orm::{ActiveValue::Set, ConnectionTrait, Database, EntityTrait, Schema};

use crate::ExportDatabase;

/// 2025-01-01T00:00:00Z
pub const BASE_SECS: i64 = 1_735_689_600;
pub const BASE_MILLIS: i64 = BASE_SECS * 1000;

pub async fn export_db() -> ExportDatabase {
    let db = Database::connect("sqlite::memory:").await.unwrap();
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

    ExportDatabase::from_connection(db)
}

/// An export holding only the device registry.
pub async fn registry_only_db() -> ExportDatabase {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(device::Entity)))
        .await
        .unwrap();
    ExportDatabase::from_connection(db)
}

pub async fn insert_device(db: &ExportDatabase, id: i64, name: &str) {
    device::Entity::insert(device::ActiveModel {
        id: Set(id),
        name: Set(name.to_owned()),
    })
    .exec_without_returning(db.connection())
    .await
    .unwrap();
}

pub async fn insert_stress(db: &ExportDatabase, rows: &[(i64, i64, i64)]) {
    let models = rows.iter().map(|&(timestamp, device_id, stress)| {
        colmi_stress_sample::ActiveModel {
            timestamp: Set(timestamp),
            device_id: Set(device_id),
            stress: Set(stress),
        }
    });
    colmi_stress_sample::Entity::insert_many(models)
        .exec_without_returning(db.connection())
        .await
        .unwrap();
}

pub async fn insert_battery(db: &ExportDatabase, rows: &[(i64, i64, i64, i64)]) {
    let models = rows
        .iter()
        .map(|&(timestamp, device_id, level, battery_index)| battery_level::ActiveModel {
            timestamp: Set(timestamp),
            device_id: Set(device_id),
            battery_index: Set(battery_index),
            level: Set(level),
        });
    battery_level::Entity::insert_many(models)
        .exec_without_returning(db.connection())
        .await
        .unwrap();
}

pub async fn insert_sleep_sessions(db: &ExportDatabase, rows: &[(i64, i64, i64)]) {
    let models = rows.iter().map(|&(timestamp, device_id, wakeup_time)| {
        colmi_sleep_session_sample::ActiveModel {
            timestamp: Set(timestamp),
            device_id: Set(device_id),
            wakeup_time: Set(wakeup_time),
        }
    });
    colmi_sleep_session_sample::Entity::insert_many(models)
        .exec_without_returning(db.connection())
        .await
        .unwrap();
}

pub async fn insert_sleep_stages(db: &ExportDatabase, rows: &[(i64, i64, i64, i64)]) {
    let models = rows.iter().map(|&(timestamp, device_id, stage, duration)| {
        colmi_sleep_stage_sample::ActiveModel {
            timestamp: Set(timestamp),
            device_id: Set(device_id),
            stage: Set(stage),
            duration: Set(duration),
        }
    });
    colmi_sleep_stage_sample::Entity::insert_many(models)
        .exec_without_returning(db.connection())
        .await
        .unwrap();
}

pub async fn insert_hrv(db: &ExportDatabase, rows: &[(i64, i64, i64)]) {
    let models = rows.iter().map(|&(timestamp, device_id, value)| {
        colmi_hrv_value_sample::ActiveModel {
            timestamp: Set(timestamp),
            device_id: Set(device_id),
            value: Set(value),
        }
    });
    colmi_hrv_value_sample::Entity::insert_many(models)
        .exec_without_returning(db.connection())
        .await
        .unwrap();
}

/// Rows are `(timestamp, device, steps, calories, distance, raw_kind)`.
pub async fn insert_activity(db: &ExportDatabase, rows: &[(i64, i64, i64, i64, i64, i64)]) {
    let models = rows.iter().map(
        |&(timestamp, device_id, steps, calories, distance, raw_kind)| {
            colmi_activity_sample::ActiveModel {
                timestamp: Set(timestamp),
                device_id: Set(device_id),
                steps: Set(steps),
                calories: Set(calories),
                distance: Set(distance),
                raw_kind: Set(raw_kind),
            }
        },
    );
    colmi_activity_sample::Entity::insert_many(models)
        .exec_without_returning(db.connection())
        .await
        .unwrap();
}

pub async fn insert_spo2(db: &ExportDatabase, rows: &[(i64, i64, i64)]) {
    let models = rows.iter().map(|&(timestamp, device_id, spo2)| {
        colmi_spo2_sample::ActiveModel {
            timestamp: Set(timestamp),
            device_id: Set(device_id),
            spo2: Set(spo2),
        }
    });
    colmi_spo2_sample::Entity::insert_many(models)
        .exec_without_returning(db.connection())
        .await
        .unwrap();
}

pub async fn insert_heart_rate(db: &ExportDatabase, rows: &[(i64, i64, i64)]) {
    let models = rows.iter().map(|&(timestamp, device_id, heart_rate)| {
        colmi_heart_rate_sample::ActiveModel {
            timestamp: Set(timestamp),
            device_id: Set(device_id),
            heart_rate: Set(heart_rate),
        }
    });
    colmi_heart_rate_sample::Entity::insert_many(models)
        .exec_without_returning(db.connection())
        .await
        .unwrap();
}

/// Two rings and a non-matching band, with one row of every metric per
/// ring plus a band row that must never be extracted.
pub async fn populated_db() -> ExportDatabase {
    let db = export_db().await;
    insert_device(&db, 1, "Colmi R02_1A2B").await;
    insert_device(&db, 2, "Mi Band 8").await;
    insert_device(&db, 3, "Colmi R06_9F00").await;

    insert_stress(&db, &[(BASE_MILLIS, 1, 31), (BASE_MILLIS + 60_000, 3, 44)]).await;
    insert_battery(&db, &[(BASE_SECS, 1, 87, 0), (BASE_SECS, 2, 50, 0)]).await;
    insert_sleep_sessions(&db, &[(BASE_MILLIS, 1, BASE_MILLIS + 50 * 60_000)]).await;
    insert_sleep_stages(&db, &[(BASE_MILLIS, 1, 2, 20)]).await;
    insert_hrv(&db, &[(BASE_MILLIS + 120_000, 3, 48)]).await;
    insert_activity(&db, &[(BASE_SECS + 300, 1, 120, 9, 80, 1)]).await;
    insert_spo2(&db, &[(BASE_MILLIS + 180_000, 1, 97)]).await;
    insert_heart_rate(
        &db,
        &[
            (BASE_MILLIS + 240_000, 1, 64),
            (BASE_MILLIS + 300_000, 1, 255),
            (BASE_MILLIS + 240_000, 2, 70),
        ],
    )
    .await;

    db
}
