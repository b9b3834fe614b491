//! PostgreSQL adapter backed by tokio-postgres.
//!
//! `Client::query` buffers the full result set before returning, so rows are
//! decoded from the materialized `Vec<Row>`.

use chrono::{DateTime, Utc};
use tokio::runtime::{Builder, Runtime};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error};

use crate::error::DriverError;

use super::{Driver, Materialization, Param, UserRow};

/// tokio-postgres driver.
pub struct TokioPostgresDriver {
    client: Client,
    rt: Runtime,
}

impl TokioPostgresDriver {
    /// Connect to the database at `url`.
    ///
    /// The connection task runs on the driver's own runtime and only makes
    /// progress while a call is blocking on it.
    pub fn connect(url: &str) -> Result<Self, DriverError> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        let config = url.parse::<tokio_postgres::Config>()?;

        let (client, connection) = rt.block_on(config.connect(NoTls))?;
        rt.spawn(async move {
            if let Err(e) = connection.await {
                error!("tokio-postgres connection error: {}", e);
            }
        });
        debug!("Connected tokio-postgres to PostgreSQL");

        Ok(Self { client, rt })
    }
}

impl Driver for TokioPostgresDriver {
    const MATERIALIZATION: Materialization = Materialization::Eager;

    fn execute(&mut self, sql: &str, params: &[Param]) -> Result<u64, DriverError> {
        let params: Vec<&(dyn ToSql + Sync)> = params.iter().map(to_sql_parameter).collect();
        let affected = self
            .rt
            .block_on(self.client.execute(sql, params.as_slice()))?;
        Ok(affected)
    }

    fn query(&mut self, sql: &str, params: &[Param]) -> Result<Vec<UserRow>, DriverError> {
        let params: Vec<&(dyn ToSql + Sync)> = params.iter().map(to_sql_parameter).collect();
        let rows = self.rt.block_on(self.client.query(sql, params.as_slice()))?;

        let decoded = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(decoded)
    }
}

fn to_sql_parameter(param: &Param) -> &(dyn ToSql + Sync) {
    match param {
        Param::Text(value) => value,
        Param::Int(value) => value,
        Param::Timestamp(value) => value,
    }
}

fn decode_row(row: &Row) -> Result<UserRow, tokio_postgres::Error> {
    Ok(UserRow {
        id: i64::from(row.try_get::<_, i32>("id")?),
        name: row.try_get::<_, Option<String>>("name")?,
        created_at: row.try_get::<_, Option<DateTime<Utc>>>("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_conversion() {
        let params = [
            Param::Text("name 0".into()),
            Param::Int(7),
            Param::Timestamp(Utc::now()),
        ];
        let converted: Vec<&(dyn ToSql + Sync)> = params.iter().map(to_sql_parameter).collect();
        assert_eq!(converted.len(), params.len());
    }

    #[test]
    fn test_invalid_url() {
        let result = TokioPostgresDriver::connect("postgres://127.0.0.1:notaport/db");
        assert!(matches!(result, Err(DriverError::TokioPostgres(_))));
    }
}
