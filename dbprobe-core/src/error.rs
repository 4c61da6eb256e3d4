//! Error types with credential-safe messages.
//!
//! Every error raised by dbprobe is immediately fatal for the current
//! invocation. Nothing in this module ever formats a password, and
//! credential errors never echo the rejected input back to the operator.

use crate::config::ConfigError;
use crate::security::CredentialError;
use thiserror::Error;

/// Main error type for dbprobe operations.
///
/// # Security
/// Messages carry field names and safe connection facts only. Passwords are
/// never part of any variant.
#[derive(Debug, Error)]
pub enum DbProbeError {
    /// Configuration file could not be loaded or failed schema checks
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Operator-supplied credentials were rejected
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Reading credentials from the operator failed
    #[error("Credential prompt failed: {context}")]
    Prompt {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Database connection failed (credentials sanitized)
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Diagnostic query failed
    #[error("Query execution failed: {context}")]
    QueryExecution {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Runtime or logging setup error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Convenience type alias for Results with DbProbeError
pub type Result<T> = std::result::Result<T, DbProbeError>;

impl DbProbeError {
    /// Creates a prompt error with context
    pub fn prompt_failed(context: impl Into<String>, error: std::io::Error) -> Self {
        Self::Prompt {
            context: context.into(),
            source: error,
        }
    }

    /// Creates a connection error with sanitized context.
    ///
    /// The context should describe the target using safe fields only
    /// (host, port, database, username).
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a query execution error
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::QueryExecution {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_transparent() {
        let error: DbProbeError = ConfigError::FieldMissing {
            field: "maxConnections",
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Configuration is missing required field 'maxConnections'"
        );
    }

    #[test]
    fn test_credential_error_is_transparent() {
        let error: DbProbeError = CredentialError::InjectionAttempt { field: "username" }.into();
        assert!(error.to_string().contains("username"));
        assert!(matches!(
            error,
            DbProbeError::Credential(CredentialError::InjectionAttempt { .. })
        ));
    }

    #[test]
    fn test_error_creation() {
        let error = DbProbeError::configuration("Failed to initialize logging");
        assert!(error.to_string().contains("Failed to initialize logging"));

        let error = DbProbeError::prompt_failed(
            "reading username",
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"),
        );
        assert!(error.to_string().contains("reading username"));
    }

    #[test]
    fn test_connection_error_keeps_source() {
        let error = DbProbeError::connection_failed(
            "alice_01@localhost:5432/app",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().contains("localhost:5432/app"));
    }
}
