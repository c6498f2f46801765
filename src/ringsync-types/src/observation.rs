use std::{collections::BTreeMap, fmt};

use crate::{Device, DeviceId, ObservationError, tags};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl FieldValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(v) => write!(f, "{v:?}"),
            FieldValue::Boolean(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One normalized, time-stamped metric record.
///
/// The timestamp is a nanosecond unix epoch. Every observation carries the
/// `device` tag and at least one field; both are checked by
/// [`ObservationBuilder::build`], and the value cannot be changed afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Observation {
    timestamp: i64,
    device: DeviceId,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
}

impl Observation {
    pub fn builder(device: &Device, timestamp: i64) -> ObservationBuilder {
        ObservationBuilder {
            timestamp,
            device: device.id,
            tags: BTreeMap::from([(tags::DEVICE.to_owned(), device.name.clone())]),
            fields: BTreeMap::new(),
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = self
            .tags
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        let fields = self
            .fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "[{tags}] {fields} @{}", self.timestamp)
    }
}

pub struct ObservationBuilder {
    timestamp: i64,
    device: DeviceId,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
}

impl ObservationBuilder {
    pub fn tag(mut self, key: &str, value: impl ToString) -> Self {
        self.tags.insert(key.to_owned(), value.to_string());
        self
    }

    pub fn field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_owned(), value.into());
        self
    }

    pub fn field_opt<V: Into<FieldValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    pub fn build(self) -> Result<Observation, ObservationError> {
        if self.fields.is_empty() {
            return Err(ObservationError::EmptyFields {
                timestamp: self.timestamp,
            });
        }

        if let Some((key, _)) = self.tags.iter().find(|(_, v)| v.is_empty()) {
            return Err(ObservationError::EmptyTag(key.clone()));
        }

        Ok(Observation {
            timestamp: self.timestamp,
            device: self.device,
            tags: self.tags,
            fields: self.fields,
        })
    }
}
