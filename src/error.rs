use thiserror::Error;

#[derive(Error, Debug)]
pub enum VmrMappingError {
    /// The caller violated a structural precondition of a mapper.
    #[error("Improper usage: {message}")]
    ImproperUsage { message: String },

    /// A scalar value could not be parsed into its internal representation.
    #[error("Data format error: {message}")]
    DataFormat { message: String },

    /// A parsed value violates a domain constraint.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// A contract violation inside the mapping layer itself. Never caused by
    /// input data; the current pass must be abandoned.
    #[error("Fatal mapping error: {message}")]
    Fatal { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VmrMappingError {
    pub fn improper_usage(message: impl Into<String>) -> Self {
        Self::ImproperUsage {
            message: message.into(),
        }
    }

    pub fn data_format(message: impl Into<String>) -> Self {
        Self::DataFormat {
            message: message.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fatal { .. })
    }

    pub fn is_improper_usage(&self) -> bool {
        matches!(self, Self::ImproperUsage { .. })
    }
}

pub type Result<T> = std::result::Result<T, VmrMappingError>;
