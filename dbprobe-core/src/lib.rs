//! Configuration gating and credential sanitization for dbprobe.
//!
//! dbprobe reads a JSON configuration file, asks an operator for database
//! credentials, validates both, and opens a PostgreSQL pool to run one
//! diagnostic query. This crate holds everything between the untrusted
//! inputs and the database client.
//!
//! # Security Guarantees
//! - Configuration is validated before the operator is prompted
//! - Credentials are sanitized before any connection attempt
//! - Passwords are zeroized on drop and never logged or formatted
//!
//! # Example
//! ```rust,no_run
//! use dbprobe_core::{StaticCredentialSource, prepare_connection};
//!
//! let mut source = StaticCredentialSource::new("alice_01", "s3cret");
//! let descriptor = prepare_connection("dbconf.json", &mut source)?;
//! println!("Connecting to {descriptor}");
//! # Ok::<(), dbprobe_core::DbProbeError>(())
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod logging;
#[cfg(feature = "postgresql")]
pub mod pool;
pub mod security;

// Re-export commonly used types
pub use config::{ConfigError, ValidatedConfig, load_config};
pub use descriptor::{ConnectionDescriptor, prepare_connection};
pub use error::{DbProbeError, Result};
pub use logging::init_logging;
pub use security::{
    Credential, CredentialError, CredentialSource, RawCredentials, StaticCredentialSource,
};
