use chrono::TimeDelta;
use ringsync_types::{Device, Observation, ObservationError};
use thiserror::Error;

use crate::units::TimeUnit;

pub const SLEEP_BUCKET_WIDTH: TimeDelta = TimeDelta::minutes(15);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("sleep session wakes up at {wakeup} before it starts at {start}")]
pub struct InvalidSleepSession {
    pub start: i64,
    pub wakeup: i64,
}

/// A sleep session with both ends as nanosecond epochs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepSession {
    start: i64,
    wakeup: i64,
}

impl SleepSession {
    pub fn new(start: i64, wakeup: i64) -> Result<Self, InvalidSleepSession> {
        if wakeup < start {
            return Err(InvalidSleepSession { start, wakeup });
        }
        Ok(Self { start, wakeup })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn wakeup(&self) -> i64 {
        self.wakeup
    }

    pub fn duration(&self) -> i64 {
        self.wakeup - self.start
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepBucket {
    pub start: i64,
    pub duration: i64,
}

/// Splits a sleep session into fixed-width `time_slept` buckets.
#[derive(Clone, Copy, Debug)]
pub struct SleepBucketer {
    width: i64,
}

impl Default for SleepBucketer {
    fn default() -> Self {
        Self::new(SLEEP_BUCKET_WIDTH)
    }
}

impl SleepBucketer {
    pub fn new(width: TimeDelta) -> Self {
        let width = width.num_nanoseconds().unwrap_or(i64::MAX).max(1);
        Self { width }
    }

    /// Full buckets from `start` while they fit before `wakeup`, then one
    /// partial bucket for the remainder at the last full-bucket boundary.
    pub fn buckets(&self, session: &SleepSession) -> Vec<SleepBucket> {
        let mut buckets = Vec::new();
        let mut current = session.start;

        while current.saturating_add(self.width) <= session.wakeup {
            buckets.push(SleepBucket {
                start: current,
                duration: self.width,
            });
            current += self.width;
        }

        if current < session.wakeup {
            buckets.push(SleepBucket {
                start: current,
                duration: session.wakeup - current,
            });
        }

        buckets
    }

    /// Bucket observations followed by the `wakeup_time` marker, which is
    /// emitted even for a zero-length session.
    pub fn observations(
        &self,
        device: &Device,
        session: &SleepSession,
    ) -> Result<Vec<Observation>, ObservationError> {
        let mut observations = self
            .buckets(session)
            .into_iter()
            .map(|bucket| {
                Observation::builder(device, bucket.start)
                    .field("time_slept", TimeUnit::Milliseconds.from_nanos(bucket.duration))
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        observations.push(
            Observation::builder(device, session.wakeup)
                .field("wakeup_time", session.wakeup)
                .build()?,
        );

        Ok(observations)
    }
}
