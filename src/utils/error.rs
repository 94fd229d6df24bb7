use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to create a directory {path}: {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} exists but is not a directory")]
    NotADirectory { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation} failed: {message}")]
    Provider {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    #[error("{record} has no {field}")]
    IncompleteRecord { record: String, field: &'static str },

    #[error("service {service} not found")]
    ServiceNotFound { service: String },

    #[error("failed to marshal {record}: {source}")]
    Serialization {
        record: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse bucket an error falls into, logged next to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Provider,
    NotFound,
    Serialization,
    Configuration,
}

impl ExportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExportError::CreateDirectory { .. }
            | ExportError::WriteFile { .. }
            | ExportError::NotADirectory { .. }
            | ExportError::Io(_) => ErrorCategory::Io,
            ExportError::Provider { .. } | ExportError::IncompleteRecord { .. } => {
                ErrorCategory::Provider
            }
            ExportError::ServiceNotFound { .. } => ErrorCategory::NotFound,
            ExportError::Serialization { .. } => ErrorCategory::Serialization,
            ExportError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Service error code reported by the provider, e.g. `ClusterNotFoundException`.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            ExportError::Provider { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
