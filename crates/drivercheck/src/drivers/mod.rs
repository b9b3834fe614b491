//! Driver adapters under comparison.
//!
//! Each adapter wraps one client library behind the [`Driver`] capability
//! trait. The adapters differ in how a query's rows come back, so every one
//! declares its [`Materialization`] up front and drains rows accordingly.

pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod sqlx_pg;
#[cfg(feature = "postgres")]
pub mod tokio_pg;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::config::BenchConfig;
use crate::error::{BenchError, DriverError};

pub use sqlite::SqliteDriver;

#[cfg(feature = "postgres")]
pub use sqlx_pg::SqlxDriver;
#[cfg(feature = "postgres")]
pub use tokio_pg::TokioPostgresDriver;

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Int(i32),
    Timestamp(DateTime<Utc>),
}

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: i64,
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// How a driver hands back query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialization {
    /// The driver buffers the whole result set before returning.
    Eager,
    /// The driver returns a lazy cursor or stream that must be drained.
    Streaming,
}

impl fmt::Display for Materialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Materialization::Eager => write!(f, "eager"),
            Materialization::Streaming => write!(f, "streaming"),
        }
    }
}

/// Capability every benchmarked driver exposes.
///
/// Calls are synchronous and block until the driver is done.
pub trait Driver {
    /// Row draining strategy used by [`Driver::query`].
    const MATERIALIZATION: Materialization;

    /// Execute a statement, returning the number of affected rows.
    fn execute(&mut self, sql: &str, params: &[Param]) -> Result<u64, DriverError>;

    /// Run a query and decode every row it produces.
    fn query(&mut self, sql: &str, params: &[Param]) -> Result<Vec<UserRow>, DriverError>;
}

/// Built-in driver adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Sqlx,
    TokioPostgres,
    Rusqlite,
}

impl DriverKind {
    /// Every built-in driver, in default run order.
    pub const ALL: [DriverKind; 3] = [
        DriverKind::Sqlx,
        DriverKind::TokioPostgres,
        DriverKind::Rusqlite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DriverKind::Sqlx => "sqlx",
            DriverKind::TokioPostgres => "tokio-postgres",
            DriverKind::Rusqlite => "rusqlite",
        }
    }

    /// Whether the adapter was compiled in.
    pub fn is_available(&self) -> bool {
        match self {
            DriverKind::Rusqlite => true,
            DriverKind::Sqlx | DriverKind::TokioPostgres => cfg!(feature = "postgres"),
        }
    }

    /// Names of the compiled-in drivers.
    pub fn available() -> Vec<String> {
        Self::ALL
            .iter()
            .filter(|kind| kind.is_available())
            .map(|kind| kind.name().to_string())
            .collect()
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DriverKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BenchError::UnknownDriver(s.to_string()))
    }
}

/// A live connection owned by the registry.
pub enum DriverHandle {
    #[cfg(feature = "postgres")]
    Sqlx(SqlxDriver),
    #[cfg(feature = "postgres")]
    TokioPostgres(TokioPostgresDriver),
    Rusqlite(SqliteDriver),
}

impl DriverHandle {
    /// Open a connection for the given driver.
    pub fn connect(kind: DriverKind, config: &BenchConfig) -> Result<Self, BenchError> {
        let connection_error = |source| BenchError::Connection {
            driver: kind.name().to_string(),
            source,
        };

        match kind {
            DriverKind::Rusqlite => SqliteDriver::open(&config.sqlite.path)
                .map(DriverHandle::Rusqlite)
                .map_err(connection_error),
            #[cfg(feature = "postgres")]
            DriverKind::Sqlx => SqlxDriver::connect(&config.postgres.url())
                .map(DriverHandle::Sqlx)
                .map_err(connection_error),
            #[cfg(feature = "postgres")]
            DriverKind::TokioPostgres => TokioPostgresDriver::connect(&config.postgres.url())
                .map(DriverHandle::TokioPostgres)
                .map_err(connection_error),
            #[cfg(not(feature = "postgres"))]
            DriverKind::Sqlx | DriverKind::TokioPostgres => Err(BenchError::DriverUnavailable {
                driver: kind.name().to_string(),
                feature: "postgres",
            }),
        }
    }

    pub fn kind(&self) -> DriverKind {
        match self {
            #[cfg(feature = "postgres")]
            DriverHandle::Sqlx(_) => DriverKind::Sqlx,
            #[cfg(feature = "postgres")]
            DriverHandle::TokioPostgres(_) => DriverKind::TokioPostgres,
            DriverHandle::Rusqlite(_) => DriverKind::Rusqlite,
        }
    }

    /// Materialization strategy of the wrapped adapter.
    pub fn materialization(&self) -> Materialization {
        match self {
            #[cfg(feature = "postgres")]
            DriverHandle::Sqlx(_) => SqlxDriver::MATERIALIZATION,
            #[cfg(feature = "postgres")]
            DriverHandle::TokioPostgres(_) => TokioPostgresDriver::MATERIALIZATION,
            DriverHandle::Rusqlite(_) => SqliteDriver::MATERIALIZATION,
        }
    }
}

impl fmt::Debug for DriverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverHandle")
            .field("kind", &self.kind())
            .field("materialization", &self.materialization())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        for kind in DriverKind::ALL {
            assert_eq!(kind.name().parse::<DriverKind>().unwrap(), kind);
        }
        assert!(matches!(
            "oracle".parse::<DriverKind>(),
            Err(BenchError::UnknownDriver(_))
        ));
    }

    #[test]
    fn test_available_always_has_sqlite() {
        let available = DriverKind::available();
        assert!(available.contains(&"rusqlite".to_string()));
        assert_eq!(
            available.contains(&"sqlx".to_string()),
            cfg!(feature = "postgres")
        );
    }

    #[test]
    fn test_connect_sqlite_in_memory() {
        let handle = DriverHandle::connect(DriverKind::Rusqlite, &BenchConfig::default()).unwrap();
        assert_eq!(handle.kind(), DriverKind::Rusqlite);
        assert_eq!(handle.materialization(), Materialization::Streaming);
    }
}
