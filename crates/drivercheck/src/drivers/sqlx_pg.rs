//! PostgreSQL adapter backed by sqlx.
//!
//! Uses a single `PgConnection` (no pool) driven on a private current-thread
//! runtime. Queries are consumed as a row stream via `fetch`.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::postgres::{PgArguments, PgConnection, PgRow};
use sqlx::query::Query;
use sqlx::{Connection, Postgres, Row};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::error::DriverError;

use super::{Driver, Materialization, Param, UserRow};

/// sqlx PostgreSQL driver.
pub struct SqlxDriver {
    conn: PgConnection,
    rt: Runtime,
}

impl SqlxDriver {
    /// Connect to the database at `url`.
    pub fn connect(url: &str) -> Result<Self, DriverError> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        let conn = rt.block_on(PgConnection::connect(url))?;
        debug!("Connected sqlx to PostgreSQL");
        Ok(Self { conn, rt })
    }
}

impl Driver for SqlxDriver {
    const MATERIALIZATION: Materialization = Materialization::Streaming;

    fn execute(&mut self, sql: &str, params: &[Param]) -> Result<u64, DriverError> {
        let Self { conn, rt } = self;
        rt.block_on(async {
            let result = bind_params(sqlx::query(sql), params)
                .execute(&mut *conn)
                .await?;
            Ok(result.rows_affected())
        })
    }

    fn query(&mut self, sql: &str, params: &[Param]) -> Result<Vec<UserRow>, DriverError> {
        let Self { conn, rt } = self;
        rt.block_on(async {
            let mut stream = bind_params(sqlx::query(sql), params).fetch(&mut *conn);

            let mut out = Vec::new();
            while let Some(row) = stream.try_next().await? {
                out.push(decode_row(&row)?);
            }
            Ok(out)
        })
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [Param],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            Param::Text(value) => query.bind(value.as_str()),
            Param::Int(value) => query.bind(*value),
            Param::Timestamp(value) => query.bind(*value),
        };
    }
    query
}

fn decode_row(row: &PgRow) -> Result<UserRow, sqlx::Error> {
    Ok(UserRow {
        id: i64::from(row.try_get::<i32, _>("id")?),
        name: row.try_get::<Option<String>, _>("name")?,
        created_at: row.try_get::<Option<DateTime<Utc>>, _>("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_refused() {
        // Port 1 is never a PostgreSQL server.
        let result = SqlxDriver::connect("postgres://127.0.0.1:1/drivercheck?sslmode=disable");
        assert!(matches!(result, Err(DriverError::Sqlx(_))));
    }
}
