//! Error types for drivers and benchmark runs.

use thiserror::Error;

use crate::catalog::Statement;
use crate::runner::Phase;

/// SQLSTATE reported by PostgreSQL for a missing relation.
#[cfg(feature = "postgres")]
const UNDEFINED_TABLE: &str = "42P01";

/// Errors raised by a driver adapter.
#[derive(Debug, Error)]
pub enum DriverError {
    /// SQLite error.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// sqlx error.
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// tokio-postgres error.
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    TokioPostgres(#[from] tokio_postgres::Error),

    /// Failed to build the runtime an async driver is driven on.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),

    /// Error produced by a driver outside the built-in adapters.
    #[error("{0}")]
    Other(String),
}

impl DriverError {
    /// Whether the error reports that the target table does not exist.
    ///
    /// The built-in adapters are classified by SQLSTATE `42P01` or SQLite's
    /// `no such table` message. Only [`DriverError::Other`] falls back to
    /// matching `does not exist` in the message text.
    pub fn is_missing_table(&self) -> bool {
        match self {
            DriverError::Sqlite(rusqlite::Error::SqliteFailure(_, Some(message))) => {
                message.starts_with("no such table")
            }
            #[cfg(feature = "postgres")]
            DriverError::Sqlx(sqlx::Error::Database(db)) => {
                db.code().as_deref() == Some(UNDEFINED_TABLE)
            }
            #[cfg(feature = "postgres")]
            DriverError::TokioPostgres(err) => {
                err.code().map(|state| state.code()) == Some(UNDEFINED_TABLE)
            }
            DriverError::Other(message) => message.contains("does not exist"),
            _ => false,
        }
    }
}

/// Benchmark errors.
///
/// Nothing is recovered: every variant terminates the run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The database could not be reached.
    #[error("{driver}: connection failed: {source}")]
    Connection {
        driver: String,
        #[source]
        source: DriverError,
    },

    /// Dropping or creating the target table failed.
    #[error("{driver}: {statement} failed: {source}")]
    Schema {
        driver: String,
        statement: Statement,
        #[source]
        source: DriverError,
    },

    /// A statement failed while a phase was being timed.
    #[error("{driver} {phase}: {source}")]
    Execution {
        driver: String,
        phase: Phase,
        #[source]
        source: DriverError,
    },

    /// No statements or adapter are registered under this name.
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// The driver exists but was compiled out.
    #[error("driver {driver} requires the `{feature}` feature")]
    DriverUnavailable {
        driver: String,
        feature: &'static str,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
