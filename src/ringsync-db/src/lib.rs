#[macro_use]
extern crate log;

mod db;
pub use db::ExportDatabase;

mod error;
pub use error::ExtractionError;

mod window;
pub use window::{ExtractionWindow, now_nanos};

pub mod extractors;
pub use extractors::MetricExtractor;

mod engine;
pub use engine::{Extraction, ExtractionEngine};

#[cfg(test)]
pub(crate) mod fixtures;
