//! Credential handling for operator-supplied input.
//!
//! This module provides:
//! - Secure credential containers with automatic memory zeroing
//! - The credential sanitizer applied to every username and password
//! - The [`CredentialSource`] seam that isolates terminal I/O
//!
//! # Security Guarantees
//! - Passwords are stored in `Zeroizing` containers
//! - Passwords are redacted from `Debug` output and never logged
//! - Validation errors never echo the rejected input

mod credentials;
mod sanitize;

pub use credentials::{Credential, RawCredentials};
pub use sanitize::{
    BLOCKED_CHARACTERS, CredentialError, PASSWORD_FIELD, USERNAME_FIELD, sanitize_credentials,
    validate_no_injection_attempt, validate_password, validate_username,
};

/// A provider of raw, unchecked credentials.
///
/// The interactive terminal prompt is one implementation; tests and
/// non-interactive callers supply their own.
pub trait CredentialSource {
    /// Reads one username/password pair.
    ///
    /// # Errors
    /// Returns an error if the underlying input could not be read.
    fn read_credentials(&mut self) -> crate::Result<RawCredentials>;
}

/// Credential source that hands out a fixed pair once.
///
/// A second read yields absent values, which the sanitizer rejects as empty.
///
/// # Example
/// ```rust
/// use dbprobe_core::security::{CredentialSource, StaticCredentialSource};
///
/// let mut source = StaticCredentialSource::new("alice_01", "s3cret");
/// let raw = source.read_credentials()?;
/// assert_eq!(raw.username.as_deref(), Some("alice_01"));
/// assert_eq!(source.reads(), 1);
/// # Ok::<(), dbprobe_core::DbProbeError>(())
/// ```
#[derive(Debug, Default)]
pub struct StaticCredentialSource {
    credentials: Option<RawCredentials>,
    reads: usize,
}

impl StaticCredentialSource {
    /// Creates a source that returns the given pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::from_raw(RawCredentials::new(username, password))
    }

    /// Creates a source that returns the given raw values.
    pub fn from_raw(credentials: RawCredentials) -> Self {
        Self {
            credentials: Some(credentials),
            reads: 0,
        }
    }

    /// Number of times the source has been read.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl CredentialSource for StaticCredentialSource {
    fn read_credentials(&mut self) -> crate::Result<RawCredentials> {
        self.reads = self.reads.saturating_add(1);
        Ok(self.credentials.take().unwrap_or_default())
    }
}
