//! SQLite adapter backed by rusqlite.
//!
//! Queries return a lazy `Rows` cursor; rows are decoded one `step` at a time.

use std::path::Path;

use rusqlite::types::ToSqlOutput;
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::debug;

use crate::error::DriverError;

use super::{Driver, Materialization, Param, UserRow};

/// In-memory database path.
pub const MEMORY: &str = ":memory:";

/// SQLite driver.
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Open a database file, or an in-memory database for `:memory:`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let conn = if path == Path::new(MEMORY) {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        debug!(path = %path.display(), "Opened SQLite database");
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self, DriverError> {
        Self::open(MEMORY)
    }
}

impl Driver for SqliteDriver {
    const MATERIALIZATION: Materialization = Materialization::Streaming;

    fn execute(&mut self, sql: &str, params: &[Param]) -> Result<u64, DriverError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let affected = stmt.execute(params_from_iter(params))?;
        Ok(affected as u64)
    }

    fn query(&mut self, sql: &str, params: &[Param]) -> Result<Vec<UserRow>, DriverError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mut rows = stmt.query(params_from_iter(params))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(UserRow {
                id: row.get("id")?,
                name: row.get("name")?,
                created_at: row.get("created_at")?,
            });
        }
        Ok(out)
    }
}

impl ToSql for Param {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Param::Text(value) => value.to_sql(),
            Param::Int(value) => value.to_sql(),
            Param::Timestamp(value) => value.to_sql(),
        }
    }
}
