//! `SeaORM` entities for the tables of a Gadgetbridge export that the
//! extractors read. Only the columns in use are declared.

pub mod prelude;

pub mod battery_level;
pub mod colmi_activity_sample;
pub mod colmi_heart_rate_sample;
pub mod colmi_hrv_value_sample;
pub mod colmi_sleep_session_sample;
pub mod colmi_sleep_stage_sample;
pub mod colmi_spo2_sample;
pub mod colmi_stress_sample;
pub mod device;
