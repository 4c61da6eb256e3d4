//! Connection descriptor assembly.
//!
//! A [`ConnectionDescriptor`] is the only value handed to the pool
//! constructor. It can only be built from a [`ValidatedConfig`] and a
//! sanitized [`Credential`], so every field it carries has passed the gate.

use crate::Result;
use crate::config::{ValidatedConfig, load_config};
use crate::security::{Credential, CredentialSource, sanitize_credentials};
use std::path::Path;
use tracing::{debug, info};

/// Validated connection parameters for the pool constructor.
///
/// # Security
/// `Debug` and `Display` never include the password.
#[derive(Clone)]
pub struct ConnectionDescriptor {
    config: ValidatedConfig,
    credential: Credential,
}

impl ConnectionDescriptor {
    /// Combines validated configuration and sanitized credentials.
    pub fn new(config: ValidatedConfig, credential: Credential) -> Self {
        Self { config, credential }
    }

    /// Database user
    pub fn user(&self) -> &str {
        self.credential.username()
    }

    /// Database password. Never log the returned value.
    pub fn password(&self) -> &str {
        self.credential.expose_password()
    }

    /// Database host
    pub fn host(&self) -> &str {
        self.config.host()
    }

    /// Database name
    pub fn database(&self) -> &str {
        self.config.database()
    }

    /// Database port
    pub fn port(&self) -> u16 {
        self.config.port()
    }

    /// Maximum pool size
    pub fn max(&self) -> u32 {
        self.config.max_connections()
    }

    /// The validated configuration part.
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }
}

impl std::fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user(),
            self.host(),
            self.port(),
            self.database()
        )
        // Intentionally omit the password
    }
}

impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("user", &self.user())
            .field("password", &"****")
            .field("host", &self.host())
            .field("database", &self.database())
            .field("port", &self.port())
            .field("max", &self.max())
            .finish()
    }
}

/// Loads the configuration, reads credentials and builds the descriptor.
///
/// The configuration is validated before `source` is touched, so a broken
/// configuration file never results in a prompt.
///
/// # Errors
/// Returns the first configuration, prompt or credential error.
pub fn prepare_connection(
    config_path: impl AsRef<Path>,
    source: &mut dyn CredentialSource,
) -> Result<ConnectionDescriptor> {
    let config = load_config(config_path)?;
    debug!("Configuration accepted: {}", config);

    let raw = source.read_credentials()?;
    let credential = sanitize_credentials(&raw)?;

    let descriptor = ConnectionDescriptor::new(config, credential);
    info!(
        host = descriptor.host(),
        port = descriptor.port(),
        database = descriptor.database(),
        user = descriptor.user(),
        "Connection parameters validated"
    );

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::security::RawCredentials;

    fn descriptor() -> ConnectionDescriptor {
        let config = parse_config(
            r#"{"host": "db.internal", "port": 6432, "database": "orders", "maxConnections": 4}"#,
        )
        .unwrap();
        let credential = sanitize_credentials(&RawCredentials::new("svc_orders", "pw")).unwrap();
        ConnectionDescriptor::new(config, credential)
    }

    #[test]
    fn test_descriptor_fields() {
        let d = descriptor();
        assert_eq!(d.user(), "svc_orders");
        assert_eq!(d.password(), "pw");
        assert_eq!(d.host(), "db.internal");
        assert_eq!(d.database(), "orders");
        assert_eq!(d.port(), 6432);
        assert_eq!(d.max(), 4);
    }

    #[test]
    fn test_descriptor_display_is_safe() {
        let d = descriptor();
        assert_eq!(d.to_string(), "svc_orders@db.internal:6432/orders");
    }

    #[test]
    fn test_descriptor_debug_redacts_password() {
        let debug = format!("{:?}", descriptor());
        assert!(debug.contains("svc_orders"));
        assert!(debug.contains("****"));
        assert!(!debug.contains("\"pw\""));
    }
}
