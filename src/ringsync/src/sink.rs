//! Points as the time-series sink sees them, and the sink seam itself.

use std::fmt::{self, Write};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum SinkValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// One line-protocol point. Tags are kept sorted by key.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkPoint {
    pub measurement: String,
    pub tags: Vec<(String, String)>,
    pub fields: Vec<(String, SinkValue)>,
    /// Nanoseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("point has no deliverable fields")]
    NoFields,
    #[error("request to sink failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sink rejected point with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn write(&self, point: &SinkPoint) -> Result<(), DeliveryError>;
}

/// Line breaks end a line-protocol record, so they become spaces before
/// escaping.
fn escape_into(out: &mut String, raw: &str, special: &[char]) {
    for c in raw.chars() {
        let c = if matches!(c, '\n' | '\r') { ' ' } else { c };
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

const MEASUREMENT_SPECIAL: &[char] = &[',', ' '];
const KEY_SPECIAL: &[char] = &[',', '=', ' '];
const STRING_SPECIAL: &[char] = &['"', '\\'];

impl SinkPoint {
    pub fn to_line_protocol(&self) -> String {
        let mut line = String::new();
        escape_into(&mut line, &self.measurement, MEASUREMENT_SPECIAL);

        for (key, value) in &self.tags {
            line.push(',');
            escape_into(&mut line, key, KEY_SPECIAL);
            line.push('=');
            escape_into(&mut line, value, KEY_SPECIAL);
        }

        for (i, (key, value)) in self.fields.iter().enumerate() {
            line.push(if i == 0 { ' ' } else { ',' });
            escape_into(&mut line, key, KEY_SPECIAL);
            line.push('=');
            match value {
                SinkValue::Integer(v) => {
                    let _ = write!(line, "{v}i");
                }
                SinkValue::Float(v) => {
                    let _ = write!(line, "{v}");
                }
                SinkValue::Text(v) => {
                    line.push('"');
                    escape_into(&mut line, v, STRING_SPECIAL);
                    line.push('"');
                }
            }
        }

        let _ = write!(line, " {}", self.timestamp);
        line
    }
}

impl fmt::Display for SinkPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line_protocol())
    }
}
