use std::{
    io,
    path::{Path, PathBuf},
};

use ringsync_db::ExportDatabase;
use sea_orm::DbErr;
use tempfile::TempDir;
use thiserror::Error;

/// File name of the staged copy inside its temporary directory.
pub const STAGED_FILE_NAME: &str = "gadgetbridge.sqlite";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("export {} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("unable to stage export {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to open staged export: {0}")]
    Open(#[from] DbErr),
}

/// Private read-only copy of the export, so the export itself may be
/// replaced while a run reads from it.
///
/// The temporary directory is removed on drop unless retention was
/// requested, in which case its location is logged.
pub struct StagedExport {
    dir: Option<TempDir>,
    database: ExportDatabase,
    retain: bool,
}

impl StagedExport {
    pub async fn stage(source: &Path, retain: bool) -> Result<Self, SourceError> {
        if !source.is_file() {
            return Err(SourceError::Missing(source.to_path_buf()));
        }

        let unreadable = |error: io::Error| SourceError::Unreadable {
            path: source.to_path_buf(),
            source: error,
        };

        let dir = tempfile::Builder::new()
            .prefix("ringsync-")
            .tempdir()
            .map_err(unreadable)?;
        let staged = dir.path().join(STAGED_FILE_NAME);
        tokio::fs::copy(source, &staged).await.map_err(unreadable)?;
        info!("Fetched database to temporary directory: {}", dir.path().display());

        let database = match ExportDatabase::open_file(&staged).await {
            Ok(database) => database,
            Err(error) => {
                if retain {
                    let kept = dir.keep();
                    info!("Temporary directory retained: {}", kept.display());
                }
                return Err(error.into());
            }
        };

        Ok(Self {
            dir: Some(dir),
            database,
            retain,
        })
    }

    pub fn database(&self) -> &ExportDatabase {
        &self.database
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.path().join(STAGED_FILE_NAME))
    }

    /// Closes the connection before the directory is cleaned up.
    pub async fn close(self) {
        if let Err(error) = self.database.clone().close().await {
            warn!("Failed to close staged export: {error}");
        }
    }
}

impl Drop for StagedExport {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        if self.retain {
            let kept = dir.keep();
            info!("Temporary directory retained: {}", kept.display());
            return;
        }

        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => debug!("Removed temporary directory: {}", path.display()),
            Err(error) => warn!(
                "Failed to remove temporary directory {}: {error}",
                path.display()
            ),
        }
    }
}
