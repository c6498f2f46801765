pub use super::battery_level::Entity as BatteryLevel;
pub use super::colmi_activity_sample::Entity as ColmiActivitySample;
pub use super::colmi_heart_rate_sample::Entity as ColmiHeartRateSample;
pub use super::colmi_hrv_value_sample::Entity as ColmiHrvValueSample;
pub use super::colmi_sleep_session_sample::Entity as ColmiSleepSessionSample;
pub use super::colmi_sleep_stage_sample::Entity as ColmiSleepStageSample;
pub use super::colmi_spo2_sample::Entity as ColmiSpo2Sample;
pub use super::colmi_stress_sample::Entity as ColmiStressSample;
pub use super::device::Entity as Device;
