//! Conversion of source-native time units into nanosecond epochs.
//!
//! The export does not agree with itself on units: the ring's own sample
//! tables store milliseconds while the generic battery and activity tables
//! store seconds, and sleep stage durations are whole minutes. Each table's
//! unit is spelled out in [`SourceTable::timestamp_unit`] and every
//! conversion goes through [`TimeUnit`].

use strum::{Display, EnumIter, IntoStaticStr};

pub const NANOS_PER_MILLI: i64 = 1_000_000;
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum TimeUnit {
    Nanoseconds,
    Milliseconds,
    Seconds,
    Minutes,
}

impl TimeUnit {
    pub const fn nanos_per_unit(self) -> i64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Milliseconds => NANOS_PER_MILLI,
            TimeUnit::Seconds => NANOS_PER_SECOND,
            TimeUnit::Minutes => NANOS_PER_MINUTE,
        }
    }

    /// Saturates instead of wrapping; any timestamp before year 2262 fits.
    pub const fn to_nanos(self, raw: i64) -> i64 {
        raw.saturating_mul(self.nanos_per_unit())
    }

    /// Floors, so a converted lower bound never excludes a sample that
    /// falls inside the original nanosecond bound.
    pub const fn from_nanos(self, nanos: i64) -> i64 {
        nanos.div_euclid(self.nanos_per_unit())
    }
}

/// Export tables read by the extractors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum SourceTable {
    #[strum(serialize = "DEVICE")]
    Device,
    #[strum(serialize = "COLMI_STRESS_SAMPLE")]
    Stress,
    #[strum(serialize = "BATTERY_LEVEL")]
    BatteryLevel,
    #[strum(serialize = "COLMI_SLEEP_SESSION_SAMPLE")]
    SleepSession,
    #[strum(serialize = "COLMI_SLEEP_STAGE_SAMPLE")]
    SleepStage,
    #[strum(serialize = "COLMI_HRV_VALUE_SAMPLE")]
    Hrv,
    #[strum(serialize = "COLMI_ACTIVITY_SAMPLE")]
    Activity,
    #[strum(serialize = "COLMI_SPO2_SAMPLE")]
    Spo2,
    #[strum(serialize = "COLMI_HEART_RATE_SAMPLE")]
    HeartRate,
}

impl SourceTable {
    pub fn table_name(self) -> &'static str {
        self.into()
    }

    /// Unit of the `TIMESTAMP` column. `None` for tables without one.
    pub const fn timestamp_unit(self) -> Option<TimeUnit> {
        match self {
            SourceTable::Device => None,
            SourceTable::BatteryLevel | SourceTable::Activity => Some(TimeUnit::Seconds),
            SourceTable::Stress
            | SourceTable::SleepSession
            | SourceTable::SleepStage
            | SourceTable::Hrv
            | SourceTable::Spo2
            | SourceTable::HeartRate => Some(TimeUnit::Milliseconds),
        }
    }
}

/// `WAKEUP_TIME` of a sleep session row.
pub const WAKEUP_TIME_UNIT: TimeUnit = TimeUnit::Milliseconds;

/// `DURATION` of a sleep stage row.
pub const SLEEP_STAGE_DURATION_UNIT: TimeUnit = TimeUnit::Minutes;
