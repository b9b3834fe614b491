//! drivercheck: database driver throughput comparison
//!
//! Runs an identical insert workload and select workload against several
//! database client libraries and reports the wall-clock time of each phase.
//!
//! # Components
//!
//! - **Catalog**: per-driver SQL statements ([`QueryCatalog`])
//! - **Drivers**: adapters behind the [`Driver`] trait (sqlx, tokio-postgres, rusqlite)
//! - **Registry**: live connections by driver name ([`DriverRegistry`])
//! - **Runner**: drop, create, timed insert and select phases ([`BenchmarkRunner`])
//! - **Report**: table, JSON and CSV output ([`Report`])

pub mod catalog;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fixtures;
pub mod registry;
pub mod report;
pub mod runner;

pub use catalog::{Dialect, QueryCatalog, Statement, StatementSet};
pub use config::{Args, BenchConfig, PostgresTarget, SqliteTarget};
pub use drivers::{Driver, DriverHandle, DriverKind, Materialization, Param, SqliteDriver, UserRow};
#[cfg(feature = "postgres")]
pub use drivers::{SqlxDriver, TokioPostgresDriver};
pub use error::{BenchError, DriverError};
pub use registry::DriverRegistry;
pub use report::{create_formatter, OutputFormat, Report};
pub use runner::{BenchmarkRunner, Phase, TimingSample};
