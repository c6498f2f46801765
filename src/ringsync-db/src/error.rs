use ringsync_algos::SourceTable;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The export is empty, corrupt or lacks a table the run needs.
    #[error("unable to read {table} from the export: {source}")]
    Unavailable {
        table: SourceTable,
        #[source]
        source: DbErr,
    },
    #[error("no device matching `{pattern}` found in the export")]
    NoTargetDevice { pattern: String },
    #[error("extraction cancelled")]
    Cancelled,
}

impl ExtractionError {
    pub(crate) fn unavailable(table: SourceTable) -> impl FnOnce(DbErr) -> Self {
        move |source| Self::Unavailable { table, source }
    }
}
