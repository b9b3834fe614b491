//! Benchmark configuration.
//!
//! With no arguments every value equals the built-in defaults below.

use std::path::PathBuf;

use clap::Parser;

use crate::drivers::{sqlite, DriverKind};
use crate::error::BenchError;
use crate::report::OutputFormat;

/// Default number of rows inserted per driver.
pub const DEFAULT_ROWS: usize = 1000;

/// Default number of select iterations per driver.
pub const DEFAULT_ITERATIONS: usize = 100;

/// Default PostgreSQL database name.
pub const DEFAULT_PG_DB: &str = "swift_test";

/// Default PostgreSQL host.
pub const DEFAULT_PG_HOST: &str = "127.0.0.1";

/// Default PostgreSQL port.
pub const DEFAULT_PG_PORT: u16 = 5432;

/// Default PostgreSQL `sslmode`.
pub const DEFAULT_PG_SSLMODE: &str = "disable";

/// drivercheck command line arguments.
#[derive(Debug, Parser)]
#[command(name = "drivercheck")]
#[command(version, about = "Compare insert/select throughput across database drivers")]
pub struct Args {
    /// Rows inserted per driver.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Select iterations per driver.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Driver to benchmark (repeatable, each at most once). Defaults to every compiled-in driver.
    #[arg(short, long = "driver")]
    pub drivers: Vec<String>,

    /// Also time an update of every inserted row.
    #[arg(long)]
    pub update: bool,

    /// Output format.
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// PostgreSQL database name.
    #[arg(long, default_value = DEFAULT_PG_DB)]
    pub pg_db: String,

    /// PostgreSQL host.
    #[arg(long, default_value = DEFAULT_PG_HOST)]
    pub pg_host: String,

    /// PostgreSQL port.
    #[arg(long, default_value_t = DEFAULT_PG_PORT)]
    pub pg_port: u16,

    /// PostgreSQL user. Defaults to the user running the process.
    #[arg(long)]
    pub pg_user: Option<String>,

    /// PostgreSQL password.
    #[arg(long)]
    pub pg_password: Option<String>,

    /// PostgreSQL sslmode (disable, prefer, require).
    #[arg(long, default_value = DEFAULT_PG_SSLMODE)]
    pub pg_sslmode: String,

    /// SQLite database path, or `:memory:`.
    #[arg(long, default_value = sqlite::MEMORY)]
    pub sqlite_path: PathBuf,
}

/// PostgreSQL connection target shared by the PostgreSQL drivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresTarget {
    pub db: String,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub sslmode: String,
}

impl PostgresTarget {
    /// Render as a `postgres://` connection URL.
    pub fn url(&self) -> String {
        let credentials = match (&self.user, &self.password) {
            (Some(user), Some(password)) => format!("{}:{}@", user, password),
            (Some(user), None) => format!("{}@", user),
            (None, Some(password)) => format!(":{}@", password),
            (None, None) => String::new(),
        };
        format!(
            "postgres://{}{}:{}/{}?sslmode={}",
            credentials, self.host, self.port, self.db, self.sslmode
        )
    }
}

impl Default for PostgresTarget {
    fn default() -> Self {
        Self {
            db: DEFAULT_PG_DB.to_string(),
            host: DEFAULT_PG_HOST.to_string(),
            port: DEFAULT_PG_PORT,
            user: None,
            password: None,
            sslmode: DEFAULT_PG_SSLMODE.to_string(),
        }
    }
}

/// SQLite target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteTarget {
    pub path: PathBuf,
}

impl Default for SqliteTarget {
    fn default() -> Self {
        Self {
            path: PathBuf::from(sqlite::MEMORY),
        }
    }
}

/// Benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Rows inserted per driver.
    pub rows: usize,
    /// Select iterations per driver.
    pub iterations: usize,
    /// Drivers to run, in order.
    pub drivers: Vec<String>,
    /// Whether to time the update phase.
    pub update: bool,
    /// Report output format.
    pub format: OutputFormat,
    pub postgres: PostgresTarget,
    pub sqlite: SqliteTarget,
}

impl BenchConfig {
    /// Set the row count.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    /// Set the select iteration count.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the drivers to run.
    pub fn with_drivers<I, S>(mut self, drivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drivers = drivers.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the update phase.
    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    /// Set the SQLite database path.
    pub fn with_sqlite_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sqlite.path = path.into();
        self
    }

    /// Set the PostgreSQL target.
    pub fn with_postgres(mut self, postgres: PostgresTarget) -> Self {
        self.postgres = postgres;
        self
    }

    /// Reject combinations the workload cannot run with.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.drivers.is_empty() {
            return Err(BenchError::Config("no drivers selected".to_string()));
        }
        if let Some(name) = self
            .drivers
            .iter()
            .enumerate()
            .find_map(|(i, name)| self.drivers[..i].contains(name).then_some(name))
        {
            return Err(BenchError::Config(format!("driver {} selected more than once", name)));
        }
        if self.update && i32::try_from(self.rows).is_err() {
            return Err(BenchError::Config(format!(
                "--rows {} exceeds the largest id the update phase can address",
                self.rows
            )));
        }
        Ok(())
    }
}

impl From<&Args> for BenchConfig {
    fn from(args: &Args) -> Self {
        let drivers = if args.drivers.is_empty() {
            DriverKind::available()
        } else {
            args.drivers.clone()
        };

        Self {
            rows: args.rows,
            iterations: args.iterations,
            drivers,
            update: args.update,
            format: args.format,
            postgres: PostgresTarget {
                db: args.pg_db.clone(),
                host: args.pg_host.clone(),
                port: args.pg_port,
                user: args.pg_user.clone(),
                password: args.pg_password.clone(),
                sslmode: args.pg_sslmode.clone(),
            },
            sqlite: SqliteTarget {
                path: args.sqlite_path.clone(),
            },
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            iterations: DEFAULT_ITERATIONS,
            drivers: DriverKind::available(),
            update: false,
            format: OutputFormat::Table,
            postgres: PostgresTarget::default(),
            sqlite: SqliteTarget::default(),
        }
    }
}
