//! PostgreSQL pool construction and the diagnostic query.
//!
//! # Security Features
//! - Connection options are set field by field; no connection URL is
//!   assembled from operator input
//! - The password is moved into the driver options and never logged
//! - Error contexts name the target with safe fields only

use crate::Result;
use crate::descriptor::ConnectionDescriptor;
use crate::error::DbProbeError;
use sqlx::Row;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// How long to wait for a pooled connection before giving up.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Query used to confirm the connection works.
pub const DIAGNOSTIC_QUERY: &str = "SELECT version()";

/// Builds driver options from a validated descriptor.
pub fn connect_options(descriptor: &ConnectionDescriptor) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(descriptor.host())
        .port(descriptor.port())
        .database(descriptor.database())
        .username(descriptor.user())
        .password(descriptor.password())
        .application_name(env!("CARGO_PKG_NAME"))
}

/// Builds pool options sized from a validated descriptor.
pub fn pool_options(descriptor: &ConnectionDescriptor) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(descriptor.max())
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Opens a connection pool. Consumes the descriptor.
///
/// # Errors
/// Returns [`DbProbeError::Connection`] if no connection can be established.
pub async fn open_pool(descriptor: ConnectionDescriptor) -> Result<PgPool> {
    let target = descriptor.to_string();
    debug!(
        "Opening pool to {} with up to {} connections",
        target,
        descriptor.max()
    );

    let pool = pool_options(&descriptor)
        .connect_with(connect_options(&descriptor))
        .await
        .map_err(|e| DbProbeError::connection_failed(target.clone(), e))?;

    info!("Connected to {}", target);
    Ok(pool)
}

/// Runs [`DIAGNOSTIC_QUERY`] and returns the server version string.
///
/// # Errors
/// Returns [`DbProbeError::QueryExecution`] if the query fails.
pub async fn server_version(pool: &PgPool) -> Result<String> {
    let row = sqlx::query(DIAGNOSTIC_QUERY)
        .fetch_one(pool)
        .await
        .map_err(|e| DbProbeError::query_failed(DIAGNOSTIC_QUERY, e))?;

    row.try_get::<String, _>(0)
        .map_err(|e| DbProbeError::query_failed("reading server version", e))
}
