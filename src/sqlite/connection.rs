use std::fmt;
use std::sync::Arc;

use rusqlite::{Connection, OpenFlags};

use crate::config::SqliteOptions;
use crate::connection::quote_literal;
use crate::error::DatabaseError;
use crate::params::Params;
use crate::results::ResultSet;

use super::params::bind_params;
use super::query::build_result_set;

/// An open `SQLite` database.
pub struct SqliteConnection {
    conn: Connection,
}

/// A statement compiled against a [`SqliteConnection`].
///
/// The compiled form lives in the connection's statement cache; the handle
/// keeps the SQL and the metadata read at prepare time.
#[derive(Debug, Clone)]
pub struct SqliteStatement {
    sql: String,
    column_names: Arc<Vec<String>>,
    parameter_count: usize,
}

impl SqliteStatement {
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }
}

impl SqliteConnection {
    /// Open the database named by `opts`.
    ///
    /// # Errors
    /// Returns `DatabaseError::Sqlite` if the file cannot be opened or the busy
    /// timeout cannot be set.
    pub fn open(opts: &SqliteOptions) -> Result<Self, DatabaseError> {
        let flags = if opts.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::default()
        };
        let conn = Connection::open_with_flags(&opts.path, flags)?;
        if let Some(timeout) = opts.busy_timeout() {
            conn.busy_timeout(timeout)?;
        }
        Ok(Self { conn })
    }

    /// Borrow the underlying rusqlite connection.
    #[must_use]
    pub fn raw(&self) -> &Connection {
        &self.conn
    }

    pub fn raw_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Compile `sql`, surfacing syntax errors now rather than at execute time.
    ///
    /// # Errors
    /// Returns `DatabaseError::Sqlite` if the statement does not compile.
    pub fn prepare(&self, sql: &str) -> Result<SqliteStatement, DatabaseError> {
        let stmt = self.conn.prepare_cached(sql)?;
        let column_names = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(SqliteStatement {
            sql: sql.to_string(),
            column_names: Arc::new(column_names),
            parameter_count: stmt.parameter_count(),
        })
    }

    /// Bind `params` and run `stmt`, buffering its rows. Row shape follows the
    /// statement as SQLite last compiled it, which can differ from the prepare
    /// time metadata after a schema change.
    ///
    /// # Errors
    /// Returns `DatabaseError` if binding or execution fails.
    pub fn execute(
        &self,
        stmt: &SqliteStatement,
        params: &Params,
    ) -> Result<ResultSet, DatabaseError> {
        let mut cached = self.conn.prepare_cached(&stmt.sql)?;
        bind_params(&mut cached, params)?;
        if cached.column_count() == 0 {
            let affected = cached.raw_execute()?;
            return Ok(ResultSet::affected(affected));
        }
        build_result_set(&mut cached, &stmt.column_names)
    }

    /// Run one or more statements, discarding any rows.
    ///
    /// # Errors
    /// Returns `DatabaseError::Sqlite` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// # Errors
    /// Returns `DatabaseError::Transaction` if a transaction is already active.
    pub fn begin(&self) -> Result<(), DatabaseError> {
        if self.in_transaction() {
            return Err(DatabaseError::Transaction(
                "SQLite transaction already in progress".into(),
            ));
        }
        self.execute_batch("BEGIN")
    }

    /// # Errors
    /// Returns `DatabaseError::Transaction` if no transaction is active.
    pub fn commit(&self) -> Result<(), DatabaseError> {
        if !self.in_transaction() {
            return Err(DatabaseError::Transaction(
                "SQLite transaction not active".into(),
            ));
        }
        self.execute_batch("COMMIT")
    }

    /// # Errors
    /// Returns `DatabaseError::Transaction` if no transaction is active.
    pub fn rollback(&self) -> Result<(), DatabaseError> {
        if !self.in_transaction() {
            return Err(DatabaseError::Transaction(
                "SQLite transaction not active".into(),
            ));
        }
        self.execute_batch("ROLLBACK")
    }

    /// Quote the way `sqlite3_mprintf("'%q'")` does: single quotes doubled.
    #[must_use]
    pub fn quote(&self, literal: &str) -> Option<String> {
        quote_literal(literal, false)
    }

    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}
