use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    #[error("Invalid color literal: {0}")]
    InvalidColor(String),

    #[error("Field `{identifier}` cannot be serialized: {reason}")]
    Unserializable { identifier: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
