use std::path::Path;

use ringsync_algos::SourceTable;
use ringsync_entities::device;
use ringsync_types::{Device, DeviceSet};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::ExtractionError;

/// Read-only handle on a staged export.
#[derive(Clone)]
pub struct ExportDatabase {
    pub(crate) db: DatabaseConnection,
}

impl ExportDatabase {
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn open<C>(options: C) -> Result<Self, DbErr>
    where
        C: Into<ConnectOptions>,
    {
        let db = Database::connect(options).await?;
        Ok(Self { db })
    }

    pub async fn open_file(path: &Path) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(format!("sqlite://{}?mode=ro", path.display()));
        options
            .max_connections(1)
            .sqlx_logging_level(log::LevelFilter::Trace);
        Self::open(options).await
    }

    pub async fn close(self) -> Result<(), DbErr> {
        self.db.close().await
    }

    /// Devices whose name contains `pattern`, compared case-sensitively.
    pub async fn find_devices(&self, pattern: &str) -> Result<DeviceSet, ExtractionError> {
        let devices = device::Entity::find()
            .order_by_asc(device::Column::Id)
            .all(&self.db)
            .await
            .map_err(ExtractionError::unavailable(SourceTable::Device))?;

        let matching = devices.into_iter().filter_map(|model| {
            if !model.name.contains(pattern) {
                return None;
            }
            if model.name.is_empty() {
                warn!("Skipping device {} with an empty name", model.id);
                return None;
            }
            Some(Device::new(model.id, model.name))
        });

        Ok(DeviceSet::new(matching))
    }
}
