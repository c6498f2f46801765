use std::{
    io,
    panic::AssertUnwindSafe,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use async_trait::async_trait;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

/// Work started by the monitor when the export changes.
#[async_trait]
pub trait SyncJob: Send + Sync {
    async fn run(&self, cancel: &CancellationToken) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The export does not exist yet.
    SourceAbsent,
    Unchanged,
    /// The export changed and the job completed.
    Ran,
    /// The export could not be inspected, or the job failed or panicked.
    Failed,
}

/// Polls the export's modification time and runs a job once per observed
/// change. Runs never overlap; a change seen while a job runs is picked up
/// by the next poll.
pub struct SyncMonitor {
    path: PathBuf,
    poll_interval: Duration,
    last_modified: Option<SystemTime>,
    state: SyncState,
    reported_absent: bool,
}

impl SyncMonitor {
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            path: path.into(),
            poll_interval,
            last_modified: None,
            state: SyncState::Idle,
            reported_absent: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    async fn modification_marker(&self) -> io::Result<Option<SystemTime>> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata.modified().map(Some),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    pub async fn poll_once<J>(&mut self, job: &J, cancel: &CancellationToken) -> PollOutcome
    where
        J: SyncJob + ?Sized,
    {
        let marker = match self.modification_marker().await {
            Ok(Some(marker)) => marker,
            Ok(None) => {
                if !self.reported_absent {
                    info!("File {} does not exist. Waiting...", self.path.display());
                    self.reported_absent = true;
                }
                return PollOutcome::SourceAbsent;
            }
            Err(error) => {
                error!("Error monitoring file {}: {error}", self.path.display());
                return PollOutcome::Failed;
            }
        };
        self.reported_absent = false;

        if self.last_modified == Some(marker) {
            return PollOutcome::Unchanged;
        }

        info!("File {} modified. Running sync job...", self.path.display());
        self.last_modified = Some(marker);
        self.state = SyncState::Running;
        let result = AssertUnwindSafe(job.run(cancel)).catch_unwind().await;
        self.state = SyncState::Idle;

        match result {
            Ok(Ok(())) => PollOutcome::Ran,
            Ok(Err(error)) => {
                error!("Sync job failed: {error:#}");
                PollOutcome::Failed
            }
            Err(_) => {
                error!("Sync job panicked");
                PollOutcome::Failed
            }
        }
    }

    /// Polls until `cancel` fires. A job already running is allowed to
    /// observe the cancellation itself.
    pub async fn run<J>(&mut self, job: &J, cancel: &CancellationToken)
    where
        J: SyncJob + ?Sized,
    {
        info!("Starting file monitoring for: {}", self.path.display());

        while !cancel.is_cancelled() {
            self.poll_once(job, cancel).await;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!("File monitoring stopped");
    }
}
