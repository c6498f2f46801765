use chrono::{DateTime, TimeDelta, Utc};
use ringsync_algos::SourceTable;

/// Lower bound of one run's range queries, as a nanosecond epoch. The upper
/// end is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractionWindow {
    start: i64,
}

impl ExtractionWindow {
    pub fn ending_at(now: DateTime<Utc>, lookback: TimeDelta) -> Self {
        let start = now
            .checked_sub_signed(lookback)
            .and_then(|start| start.timestamp_nanos_opt())
            .unwrap_or_default();
        Self { start }
    }

    pub fn since(start: i64) -> Self {
        Self { start }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    /// The window start in the unit of `table`'s timestamp column.
    pub fn lower_bound(&self, table: SourceTable) -> i64 {
        match table.timestamp_unit() {
            Some(unit) => unit.from_nanos(self.start),
            None => self.start,
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start
    }
}

pub fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}
