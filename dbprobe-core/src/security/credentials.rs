//! Secure credential containers with automatic memory zeroing.
//!
//! # Security
//! - Passwords are stored in `Zeroizing<T>` containers
//! - Memory is automatically cleared when credentials go out of scope
//! - Passwords are never exposed in debug output or logs

use zeroize::{Zeroize, Zeroizing};

/// Unchecked credentials as read from a credential source.
///
/// `None` means the value was not provided at all (for example the input
/// stream ended before the prompt was answered).
#[derive(Clone, Default, Zeroize)]
#[zeroize(drop)]
pub struct RawCredentials {
    /// Username as entered
    pub username: Option<String>,
    /// Password as entered
    pub password: Option<String>,
}

impl RawCredentials {
    /// Creates raw credentials from two provided values.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

impl std::fmt::Debug for RawCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Sanitized username/password pair.
///
/// Only [`sanitize_credentials`](super::sanitize_credentials) constructs
/// these, so holding a `Credential` means both values passed validation.
///
/// # Example
///
/// ```rust
/// use dbprobe_core::security::{RawCredentials, sanitize_credentials};
///
/// let creds = sanitize_credentials(&RawCredentials::new("admin", "secret"))?;
/// assert_eq!(creds.username(), "admin");
/// assert!(!format!("{creds:?}").contains("secret"));
/// // Password is automatically zeroed when `creds` is dropped
/// # Ok::<(), dbprobe_core::security::CredentialError>(())
/// ```
#[derive(Clone)]
pub struct Credential {
    username: String,
    password: Zeroizing<String>,
}

impl Credential {
    pub(crate) fn new(username: String, password: String) -> Self {
        Self {
            username,
            password: Zeroizing::new(password),
        }
    }

    /// Gets the username. Safe to log.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Gets the password for handing to the database client.
    ///
    /// # Security
    /// Never log or format the returned value.
    pub fn expose_password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_accessors() {
        let creds = Credential::new("testuser".to_string(), "testpass".to_string());
        assert_eq!(creds.username(), "testuser");
        assert_eq!(creds.expose_password(), "testpass");
    }

    #[test]
    fn test_credential_debug_redacts_password() {
        let creds = Credential::new("testuser".to_string(), "testpass".to_string());
        let debug = format!("{creds:?}");
        assert!(debug.contains("testuser"));
        assert!(!debug.contains("testpass"));
        assert!(debug.contains("****"));
    }

    #[test]
    fn test_raw_credentials_debug_redacts_password() {
        let raw = RawCredentials::new("testuser", "testpass");
        let debug = format!("{raw:?}");
        assert!(!debug.contains("testpass"));

        let absent = RawCredentials::default();
        assert!(format!("{absent:?}").contains("None"));
    }

    #[test]
    fn test_credential_clone() {
        let creds1 = Credential::new("user".to_string(), "pass".to_string());
        let creds2 = creds1.clone();
        assert_eq!(creds1.username(), creds2.username());
        assert_eq!(creds1.expose_password(), creds2.expose_password());
    }
}
