//! SQL statements per driver.
//!
//! Placeholder syntax and DDL differ between databases, so every driver name
//! maps to its own [`StatementSet`].

use std::collections::BTreeMap;
use std::fmt;

use crate::error::BenchError;

/// Logical name of a benchmark statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statement {
    Drop,
    Create,
    Insert,
    Update,
    Select,
}

impl Statement {
    /// All statements, in execution order.
    pub const ALL: [Statement; 5] = [
        Statement::Drop,
        Statement::Create,
        Statement::Insert,
        Statement::Update,
        Statement::Select,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Statement::Drop => "drop",
            Statement::Create => "create",
            Statement::Insert => "insert",
            Statement::Update => "update",
            Statement::Select => "select",
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL dialect spoken by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `$n` placeholders, `serial` ids.
    Postgres,
    /// `?` placeholders, rowid ids.
    Sqlite,
}

/// The five statements a driver runs, in its own dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSet {
    pub drop: String,
    pub create: String,
    pub insert: String,
    pub update: String,
    pub select: String,
}

impl StatementSet {
    /// Build the `users` workload statements for a dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Postgres => Self {
                drop: "drop table if exists users".into(),
                create: "create table users(id serial primary key, name text, created_at timestamp with time zone)".into(),
                insert: "insert into users(name, created_at) values ($1, $2)".into(),
                update: "update users set name = $1, created_at = $2 where id = $3".into(),
                select: "select * from users where id > $1".into(),
            },
            Dialect::Sqlite => Self {
                drop: "drop table if exists users".into(),
                create: "create table users(id integer primary key autoincrement, name text, created_at timestamp)".into(),
                insert: "insert into users(name, created_at) values (?, ?)".into(),
                update: "update users set name = ?, created_at = ? where id = ?".into(),
                select: "select * from users where id > ?".into(),
            },
        }
    }

    /// Look up a statement by logical name.
    pub fn get(&self, statement: Statement) -> &str {
        match statement {
            Statement::Drop => &self.drop,
            Statement::Create => &self.create,
            Statement::Insert => &self.insert,
            Statement::Update => &self.update,
            Statement::Select => &self.select,
        }
    }
}

/// Driver name to statement set.
#[derive(Debug, Clone, Default)]
pub struct QueryCatalog {
    entries: BTreeMap<String, StatementSet>,
}

impl QueryCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog covering every built-in driver.
    pub fn standard() -> Self {
        Self::new()
            .with_statements("sqlx", StatementSet::for_dialect(Dialect::Postgres))
            .with_statements("tokio-postgres", StatementSet::for_dialect(Dialect::Postgres))
            .with_statements("rusqlite", StatementSet::for_dialect(Dialect::Sqlite))
    }

    /// Register statements for a driver name.
    pub fn with_statements(mut self, driver: impl Into<String>, statements: StatementSet) -> Self {
        self.entries.insert(driver.into(), statements);
        self
    }

    /// Statements for a driver.
    pub fn statements_for(&self, driver: &str) -> Result<&StatementSet, BenchError> {
        self.entries
            .get(driver)
            .ok_or_else(|| BenchError::UnknownDriver(driver.to_string()))
    }

    /// Resolve a list of driver names, failing on the first unknown one.
    pub fn resolve<'a, S: AsRef<str>>(
        &'a self,
        drivers: &'a [S],
    ) -> Result<Vec<(&'a str, &'a StatementSet)>, BenchError> {
        drivers
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.statements_for(name).map(|statements| (name, statements))
            })
            .collect()
    }

    /// Registered driver names.
    pub fn drivers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
