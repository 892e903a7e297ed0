use crate::config::ConnectionConfig;
use crate::error::DatabaseError;
use crate::params::Params;
use crate::results::ResultSet;

#[cfg(feature = "postgres")]
use crate::postgres::{PostgresConnection, PostgresStatement};
#[cfg(feature = "sqlite")]
use crate::sqlite::{SqliteConnection, SqliteStatement};

/// The raw driver connection held by a [`crate::Database`].
#[derive(Debug)]
pub enum DbConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnection),
    #[cfg(feature = "postgres")]
    Postgres(PostgresConnection),
}

/// A prepared statement, compiled by the driver that owns it.
#[derive(Debug, Clone)]
pub enum StatementHandle {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteStatement),
    #[cfg(feature = "postgres")]
    Postgres(PostgresStatement),
}

impl StatementHandle {
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        match self {
            #[cfg(feature = "sqlite")]
            StatementHandle::Sqlite(stmt) => stmt.column_names(),
            #[cfg(feature = "postgres")]
            StatementHandle::Postgres(stmt) => stmt.column_names(),
            #[allow(unreachable_patterns)]
            _ => &[],
        }
    }
}

fn mismatched() -> DatabaseError {
    DatabaseError::Connection("statement was prepared by a different driver".into())
}

impl DbConnection {
    /// Open a connection for `config`.
    ///
    /// # Errors
    /// Returns `DatabaseError::Config` if the driver was not compiled in, or the
    /// driver's error if connecting fails.
    pub fn open(config: &ConnectionConfig) -> Result<Self, DatabaseError> {
        match config {
            #[cfg(feature = "sqlite")]
            ConnectionConfig::Sqlite(opts) => {
                Ok(DbConnection::Sqlite(SqliteConnection::open(opts)?))
            }
            #[cfg(feature = "postgres")]
            ConnectionConfig::Postgres(opts) => {
                Ok(DbConnection::Postgres(PostgresConnection::connect(opts)?))
            }
            #[allow(unreachable_patterns)]
            other => Err(DatabaseError::Config(format!(
                "driver {:?} is not enabled in this build",
                other.driver()
            ))),
        }
    }

    #[cfg(feature = "sqlite")]
    #[must_use]
    pub fn as_sqlite(&self) -> Option<&rusqlite::Connection> {
        match self {
            DbConnection::Sqlite(conn) => Some(conn.raw()),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[cfg(feature = "sqlite")]
    pub fn as_sqlite_mut(&mut self) -> Option<&mut rusqlite::Connection> {
        match self {
            DbConnection::Sqlite(conn) => Some(conn.raw_mut()),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[cfg(feature = "postgres")]
    #[must_use]
    pub fn as_postgres(&self) -> Option<&PostgresConnection> {
        match self {
            DbConnection::Postgres(conn) => Some(conn),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    pub(crate) fn prepare(&self, sql: &str) -> Result<StatementHandle, DatabaseError> {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => Ok(StatementHandle::Sqlite(conn.prepare(sql)?)),
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => Ok(StatementHandle::Postgres(conn.prepare(sql)?)),
        }
    }

    pub(crate) fn execute(
        &self,
        stmt: &StatementHandle,
        params: &Params,
    ) -> Result<ResultSet, DatabaseError> {
        match (self, stmt) {
            #[cfg(feature = "sqlite")]
            (DbConnection::Sqlite(conn), StatementHandle::Sqlite(stmt)) => {
                conn.execute(stmt, params)
            }
            #[cfg(feature = "postgres")]
            (DbConnection::Postgres(conn), StatementHandle::Postgres(stmt)) => {
                conn.execute(stmt, params)
            }
            #[allow(unreachable_patterns)]
            _ => Err(mismatched()),
        }
    }

    pub(crate) fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.execute_batch(sql),
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.execute_batch(sql),
        }
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.in_transaction(),
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.in_transaction(),
        }
    }

    pub(crate) fn begin(&mut self) -> Result<(), DatabaseError> {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.begin(),
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.begin(),
        }
    }

    pub(crate) fn commit(&mut self) -> Result<(), DatabaseError> {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.commit(),
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.commit(),
        }
    }

    pub(crate) fn rollback(&mut self) -> Result<(), DatabaseError> {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.rollback(),
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.rollback(),
        }
    }

    pub(crate) fn quote(&self, literal: &str) -> Option<String> {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.quote(literal),
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.quote(literal),
        }
    }

    pub(crate) fn last_insert_id(&self) -> Result<i64, DatabaseError> {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => Ok(conn.last_insert_id()),
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.last_insert_id(),
        }
    }
}

/// Wrap `literal` in single quotes, doubling embedded single quotes.
///
/// With `escape_backslashes` a literal containing `\` is written in the
/// `E'...'` form with backslashes doubled, so it reads back unchanged whatever
/// the server's `standard_conforming_strings` setting. Literals containing NUL
/// cannot be represented and yield `None`.
pub(crate) fn quote_literal(literal: &str, escape_backslashes: bool) -> Option<String> {
    if literal.contains('\0') {
        return None;
    }
    let escape = escape_backslashes && literal.contains('\\');
    let mut quoted = String::with_capacity(literal.len() + 3);
    if escape {
        quoted.push('E');
    }
    quoted.push('\'');
    for c in literal.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' if escape => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    Some(quoted)
}
