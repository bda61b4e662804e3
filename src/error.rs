use thiserror::Error;

use crate::domain::operation::Field;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON document: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Parameters validation failed for one or more parameters: [{}]", join_fields(.0))]
    Validation(Vec<Field>),

    #[error("{kind} '{name}' does not exist")]
    NotFound { kind: &'static str, name: String },

    #[error("Can only run 1 {name} process at once (held by {holder})")]
    Conflict { name: String, holder: String },

    #[error("Backend operation failed: {0}")]
    Collaborator(String),

    #[error("Could not read operator confirmation: {0}")]
    Prompt(std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("unknown version policy '{0}', expected 'requireSupported' or 'rejectSupported'")]
    UnknownVersionPolicy(String),

    #[error("unknown node role '{0}'")]
    UnknownNodeRole(String),

    #[error("supported version '{0}' is not a major.minor version")]
    MalformedSupportedVersion(String),

    #[error("maxNodesPerRole must be at least 1, got {0}")]
    InvalidNodeLimit(i64),
}

impl Error {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Validation(_) => 1,
            Error::Conflict { .. } => 3,
            _ => 2,
        }
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields.iter().map(|field| field.name()).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
