//! Error types for wfctl.

/// Result type alias for wfctl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for wfctl.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration file contains a value that cannot be used as an option.
    #[error("unsupported value for '{key}' in config file '{path}': {reason}")]
    ConfigValue {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Offending setting.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A single option failed validation.
    #[error("argument --{option}: {message}")]
    InvalidArgument {
        /// Option name, in command-line form.
        option: String,
        /// Description of the validation failure.
        message: String,
    },

    /// A combination of options failed validation.
    #[error("{message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// The service could not be reached, even after retries.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with something other than the expected payload.
    #[error("service returned an error: {message}")]
    ServiceRejected {
        /// Message extracted from the response.
        message: String,
    },

    /// Storage access token could not be created.
    #[error("storage error: {reason}")]
    Storage {
        /// Description of the storage failure.
        reason: String,
    },

    /// Failed to write the workflow report.
    #[error("failed to write report")]
    ReportWrite {
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Failed to serialize a request body.
    #[error("failed to serialize request body")]
    RequestSerialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Build an [`Error::InvalidArgument`] for the given option key.
    ///
    /// Keys are stored with underscores; they are reported the way they are
    /// typed on the command line.
    pub fn invalid_argument(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            option: key.replace('_', "-"),
            message: message.into(),
        }
    }

    /// Build an [`Error::Validation`] for a cross-option rule.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error was caused by malformed or contradictory input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::Validation { .. })
    }

    /// Process exit code for errors raised before any workflow action ran.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. }
            | Self::Validation { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigValue { .. } => crate::constants::exit::USAGE,
            Self::Storage { .. } => crate::constants::exit::STORAGE,
            _ => crate::constants::exit::GENERAL,
        }
    }
}

/// Failure to exchange a request with the workflow service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete in time.
    #[error("request to '{url}' timed out")]
    Timeout {
        /// Target URL.
        url: String,
    },

    /// The connection could not be established or was dropped.
    #[error("could not connect to '{url}': {reason}")]
    Connect {
        /// Target URL.
        url: String,
        /// Underlying error text.
        reason: String,
    },

    /// The request could not be built or sent for a non-network reason.
    #[error("request to '{url}' failed: {reason}")]
    Request {
        /// Target URL.
        url: String,
        /// Underlying error text.
        reason: String,
    },
}

impl TransportError {
    /// Whether the failure is worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connect { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_uses_dashed_option_name() {
        let err = Error::invalid_argument("input_blob_name_1", "bad name");
        assert_eq!(err.to_string(), "argument --input-blob-name-1: bad name");
        assert!(err.is_validation());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::validation("x").exit_code(), 2);
        assert_eq!(
            Error::Storage {
                reason: "x".to_string()
            }
            .exit_code(),
            200
        );
        assert_eq!(
            Error::Internal {
                message: "x".to_string()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_transport_error_transience() {
        let timeout = TransportError::Timeout {
            url: "http://x".to_string(),
        };
        let request = TransportError::Request {
            url: "http://x".to_string(),
            reason: "bad header".to_string(),
        };
        assert!(timeout.is_transient());
        assert!(!request.is_transient());
    }
}
