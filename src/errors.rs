use derive_more::{Display, Error};

/// Failures while building signed init data. Every variant is fatal to the run.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum InitDataError {
    /// Missing or malformed input, raised before any hashing happens
    #[display("configuration error: {_0}")]
    ConfigurationError(#[error(not(source))] String),
    /// The user record could not be turned into JSON text
    #[display("serialization error: {_0}")]
    SerializationError(#[error(not(source))] String),
}

impl InitDataError {
    pub fn missing_field(name: &str) -> Self {
        InitDataError::ConfigurationError(format!("required field `{name}` is missing or empty"))
    }
}
