pub mod units;
pub use units::{SourceTable, TimeUnit};

pub(crate) mod sleep;
pub use sleep::{InvalidSleepSession, SLEEP_BUCKET_WIDTH, SleepBucket, SleepBucketer, SleepSession};

pub(crate) mod liveness;
pub use liveness::{LivenessTracker, SYNC_CHECK};
