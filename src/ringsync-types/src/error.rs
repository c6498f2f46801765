use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObservationError {
    #[error("observation at {timestamp} has no fields")]
    EmptyFields { timestamp: i64 },
    #[error("tag `{0}` has an empty value")]
    EmptyTag(String),
}
