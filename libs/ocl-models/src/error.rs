//! Error types for dictionary models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown {kind}: {value}")]
    UnknownMember { kind: &'static str, value: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid concept URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
