//! Configuration loading and schema gating.
//!
//! The configuration file is untrusted input. It is parsed once as JSON and
//! checked against a declarative schema of required fields before any value
//! is handed to the rest of the program. The first violation wins; errors are
//! never aggregated.
//!
//! # Example
//! ```rust
//! use dbprobe_core::config::parse_config;
//!
//! let config = parse_config(
//!     r#"{"host": "localhost", "port": 5432, "database": "app", "maxConnections": 10}"#,
//! )?;
//! assert_eq!(config.port(), 5432);
//! assert_eq!(config.max_connections(), 10);
//! # Ok::<(), dbprobe_core::config::ConfigError>(())
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dbconf.json";

/// Field name of the database host.
pub const FIELD_HOST: &str = "host";
/// Field name of the database port.
pub const FIELD_PORT: &str = "port";
/// Field name of the database name.
pub const FIELD_DATABASE: &str = "database";
/// Field name of the pool size limit.
pub const FIELD_MAX_CONNECTIONS: &str = "maxConnections";

/// Required fields and their JSON types, checked in order.
///
/// Adding a field here is enough for presence and type checks; only the
/// conversion into [`ValidatedConfig`] needs to learn about it.
pub const CONFIG_SCHEMA: &[(&str, FieldType)] = &[
    (FIELD_HOST, FieldType::String),
    (FIELD_PORT, FieldType::Number),
    (FIELD_DATABASE, FieldType::String),
    (FIELD_MAX_CONNECTIONS, FieldType::Number),
];

/// Errors raised while loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("Configuration file not found: {}", path.display())]
    FileMissing { path: PathBuf },

    /// The configuration file exists but could not be read
    #[error("Failed to read configuration file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not a JSON object
    #[error("Configuration is not valid JSON: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A required field is absent
    #[error("Configuration is missing required field '{field}'")]
    FieldMissing { field: &'static str },

    /// A required field has the wrong JSON type
    #[error("Invalid type for field '{field}': expected {expected}, got {actual}")]
    FieldTypeMismatch {
        field: &'static str,
        expected: FieldType,
        actual: &'static str,
    },

    /// A numeric field does not fit its domain
    #[error("Field '{field}' is out of range: expected {expected}")]
    FieldOutOfRange {
        field: &'static str,
        expected: &'static str,
    },
}

impl ConfigError {
    /// Name of the offending field, for field-level errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::FieldMissing { field }
            | Self::FieldTypeMismatch { field, .. }
            | Self::FieldOutOfRange { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// JSON type expected for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A JSON string
    String,
    /// A JSON number
    Number,
}

impl FieldType {
    /// Returns true if `value` has this JSON type.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
        }
    }
}

/// Name of the JSON type of `value`, as reported in type mismatch errors.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Configuration that passed schema presence and type checks.
///
/// Immutable once constructed. Unknown fields of the source document are
/// dropped during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedConfig {
    host: String,
    port: u16,
    database: String,
    max_connections: u32,
}

impl ValidatedConfig {
    /// Database host address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Database port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Database name
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Maximum number of pooled connections
    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

impl std::fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

/// Loads and validates the configuration file at `path`.
///
/// # Errors
/// - [`ConfigError::FileMissing`] if the file does not exist
/// - [`ConfigError::Read`] if it exists but cannot be read
/// - [`ConfigError::Parse`] if it is not a JSON object
/// - field-level errors from [`validate_config`]
pub fn load_config(path: impl AsRef<Path>) -> Result<ValidatedConfig, ConfigError> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileMissing {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let config = parse_config(&content)?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parses configuration text and validates it against [`CONFIG_SCHEMA`].
///
/// # Errors
/// Returns [`ConfigError::Parse`] for malformed JSON, otherwise the first
/// field-level violation.
pub fn parse_config(text: &str) -> Result<ValidatedConfig, ConfigError> {
    let raw: Value = serde_json::from_str(text).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
        source: Some(e),
    })?;

    validate_config(&raw)
}

/// Validates already-parsed configuration data.
///
/// Fields are checked in schema order: presence first, then JSON type.
/// Numeric fields are then narrowed to their typed domain.
///
/// # Errors
/// Returns the first violation found.
pub fn validate_config(raw: &Value) -> Result<ValidatedConfig, ConfigError> {
    let Some(object) = raw.as_object() else {
        return Err(ConfigError::Parse {
            message: format!("expected an object, got {}", json_type_name(raw)),
            source: None,
        });
    };

    for &(field, expected) in CONFIG_SCHEMA {
        let value = object
            .get(field)
            .ok_or(ConfigError::FieldMissing { field })?;

        if !expected.matches(value) {
            return Err(ConfigError::FieldTypeMismatch {
                field,
                expected,
                actual: json_type_name(value),
            });
        }
    }

    let port = integer_field(object, FIELD_PORT, 1, u64::from(u16::MAX))?;
    let max_connections = integer_field(object, FIELD_MAX_CONNECTIONS, 1, u64::from(u32::MAX))?;

    Ok(ValidatedConfig {
        host: string_field(object, FIELD_HOST)?,
        port: u16::try_from(port).map_err(|_| out_of_range(FIELD_PORT))?,
        database: string_field(object, FIELD_DATABASE)?,
        max_connections: u32::try_from(max_connections)
            .map_err(|_| out_of_range(FIELD_MAX_CONNECTIONS))?,
    })
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> Result<String, ConfigError> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ConfigError::FieldTypeMismatch {
            field,
            expected: FieldType::String,
            actual: json_type_name(other),
        }),
        None => Err(ConfigError::FieldMissing { field }),
    }
}

/// Reads a whole number in `min..=max`. Floats with no fractional part
/// (`5432.0`) are accepted.
fn integer_field(
    object: &Map<String, Value>,
    field: &'static str,
    min: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let number = match object.get(field) {
        Some(Value::Number(n)) => n,
        Some(other) => {
            return Err(ConfigError::FieldTypeMismatch {
                field,
                expected: FieldType::Number,
                actual: json_type_name(other),
            });
        }
        None => return Err(ConfigError::FieldMissing { field }),
    };

    let value = match number.as_u64() {
        Some(v) => v,
        None => match number.as_f64() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= max as f64 => f as u64,
            _ => return Err(out_of_range(field)),
        },
    };

    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(out_of_range(field))
    }
}

fn out_of_range(field: &'static str) -> ConfigError {
    let expected = match field {
        FIELD_PORT => "a whole number between 1 and 65535",
        _ => "a whole number greater than 0",
    };
    ConfigError::FieldOutOfRange { field, expected }
}
