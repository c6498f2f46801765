#[macro_use]
extern crate serde;

mod device;
pub use device::{Device, DeviceId, DeviceSet};

mod error;
pub use error::ObservationError;

mod observation;
pub use observation::{FieldValue, Observation, ObservationBuilder};

/// Tag keys shared by the extractors and the sink.
pub mod tags {
    pub const DEVICE: &str = "device";
    pub const SAMPLE_TYPE: &str = "sample_type";
    pub const BATTERY: &str = "battery";
    pub const ACTIVITY_KIND: &str = "activity_kind";
}
