//! Benchmark runner.
//!
//! Drives each connection through drop, create, the timed insert phase and
//! the timed select phase (plus the optional update phase), strictly one
//! driver and one phase at a time.

use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::catalog::{QueryCatalog, Statement, StatementSet};
use crate::config::BenchConfig;
use crate::drivers::{Driver, DriverHandle, Materialization};
use crate::error::{BenchError, DriverError};
use crate::fixtures;
use crate::registry::DriverRegistry;
use crate::report::Report;

/// A timed segment of the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Insert,
    Select,
    Update,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Insert => "insert",
            Phase::Select => "select",
            Phase::Update => "update",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock time of one (driver, phase) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSample {
    pub driver: String,
    pub phase: Phase,
    /// Statements issued during the phase.
    pub operations: usize,
    pub elapsed: Duration,
    pub materialization: Materialization,
}

impl TimingSample {
    /// `"<driver> <phase>"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.driver, self.phase)
    }

    /// Throughput, or `None` when nothing was timed.
    pub fn ops_per_sec(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        if self.operations == 0 || secs == 0.0 {
            None
        } else {
            Some(self.operations as f64 / secs)
        }
    }
}

/// Runs the insert/select workload against each registered driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkRunner {
    rows: usize,
    iterations: usize,
    update: bool,
}

impl BenchmarkRunner {
    /// Create a runner inserting `rows` rows and running `iterations` selects.
    pub fn new(rows: usize, iterations: usize) -> Self {
        Self {
            rows,
            iterations,
            update: false,
        }
    }

    /// Enable the update phase.
    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Run every registered driver in order.
    ///
    /// Stops at the first error; samples recorded before it stay in `report`.
    pub fn run(
        &self,
        registry: &mut DriverRegistry,
        catalog: &QueryCatalog,
        report: &mut Report,
    ) -> Result<(), BenchError> {
        for (name, handle) in registry.iter_mut() {
            let statements = catalog.statements_for(name)?;
            match handle {
                #[cfg(feature = "postgres")]
                DriverHandle::Sqlx(driver) => self.run_driver(name, driver, statements, report)?,
                #[cfg(feature = "postgres")]
                DriverHandle::TokioPostgres(driver) => {
                    self.run_driver(name, driver, statements, report)?
                }
                DriverHandle::Rusqlite(driver) => {
                    self.run_driver(name, driver, statements, report)?
                }
            }
        }
        Ok(())
    }

    /// Run the full workload against a single driver.
    pub fn run_driver<D: Driver>(
        &self,
        name: &str,
        driver: &mut D,
        statements: &StatementSet,
        report: &mut Report,
    ) -> Result<(), BenchError> {
        info!(
            driver = name,
            rows = self.rows,
            iterations = self.iterations,
            materialization = %D::MATERIALIZATION,
            "Benchmarking driver"
        );

        self.reset_schema(name, driver, statements)?;
        report.push(self.insert_phase(name, driver, statements)?);
        report.push(self.select_phase(name, driver, statements)?);
        if self.update {
            report.push(self.update_phase(name, driver, statements)?);
        }
        Ok(())
    }

    /// Drop and recreate the `users` table.
    pub fn reset_schema<D: Driver>(
        &self,
        name: &str,
        driver: &mut D,
        statements: &StatementSet,
    ) -> Result<(), BenchError> {
        let schema_error = |statement, source| BenchError::Schema {
            driver: name.to_string(),
            statement,
            source,
        };

        match driver.execute(&statements.drop, &[]) {
            Ok(_) => {}
            Err(e) if e.is_missing_table() => {
                debug!(driver = name, error = %e, "Ignoring drop of missing table");
            }
            Err(e) => return Err(schema_error(Statement::Drop, e)),
        }

        driver
            .execute(&statements.create, &[])
            .map_err(|e| schema_error(Statement::Create, e))?;
        Ok(())
    }

    fn insert_phase<D: Driver>(
        &self,
        name: &str,
        driver: &mut D,
        statements: &StatementSet,
    ) -> Result<TimingSample, BenchError> {
        time_phase::<D, _>(name, Phase::Insert, self.rows, || {
            for n in 0..self.rows {
                driver.execute(&statements.insert, &fixtures::insert_params(n))?;
            }
            Ok(())
        })
    }

    fn select_phase<D: Driver>(
        &self,
        name: &str,
        driver: &mut D,
        statements: &StatementSet,
    ) -> Result<TimingSample, BenchError> {
        let params = fixtures::select_params();
        time_phase::<D, _>(name, Phase::Select, self.iterations, || {
            for _ in 0..self.iterations {
                let rows = driver.query(&statements.select, &params)?;
                black_box(rows);
            }
            Ok(())
        })
    }

    fn update_phase<D: Driver>(
        &self,
        name: &str,
        driver: &mut D,
        statements: &StatementSet,
    ) -> Result<TimingSample, BenchError> {
        // Ids start at 1 on a freshly created table.
        let ids = (1..=self.rows)
            .map(|id| {
                i32::try_from(id).map_err(|_| {
                    BenchError::Config(format!("row id {} does not fit an int4 column", id))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        time_phase::<D, _>(name, Phase::Update, ids.len(), || {
            for (n, id) in ids.iter().enumerate() {
                let affected = driver.execute(&statements.update, &fixtures::update_params(n, *id))?;
                if affected == 0 {
                    return Err(DriverError::Other(format!("no row with id {} to update", id)));
                }
            }
            Ok(())
        })
    }
}

impl From<&BenchConfig> for BenchmarkRunner {
    fn from(config: &BenchConfig) -> Self {
        Self::new(config.rows, config.iterations).with_update(config.update)
    }
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::from(&BenchConfig::default())
    }
}

fn time_phase<D, F>(
    name: &str,
    phase: Phase,
    operations: usize,
    work: F,
) -> Result<TimingSample, BenchError>
where
    D: Driver,
    F: FnOnce() -> Result<(), DriverError>,
{
    let start = Instant::now();
    work().map_err(|source| BenchError::Execution {
        driver: name.to_string(),
        phase,
        source,
    })?;
    let elapsed = start.elapsed();

    info!(
        driver = name,
        phase = %phase,
        operations,
        elapsed_ms = elapsed.as_millis() as u64,
        "Phase complete"
    );

    Ok(TimingSample {
        driver: name.to_string(),
        phase,
        operations,
        elapsed,
        materialization: D::MATERIALIZATION,
    })
}
