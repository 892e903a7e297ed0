use crate::config::ConnectionConfig;
use crate::connection::DbConnection;
use crate::error::DatabaseError;
use crate::types::Driver;

use super::prepared::Statement;

/// A fluent, chainable handle on one database connection.
///
/// Holds the connection configuration, the open connection and the one
/// statement most recently prepared on it. Mutating calls return `&mut Self`
/// so they chain with `?`:
/// ```rust
/// use tietokanta::prelude::*;
///
/// let mut db = Database::from_dsn("sqlite::memory:")?;
/// let row = db.connect()?.query("SELECT 1")?.fetch_numeric_row()?;
/// assert_eq!(row, Some(vec![SqlValue::Int(1)]));
/// # Ok::<(), DatabaseError>(())
/// ```
///
/// Not meant to be shared: every call takes `&mut self`, and preparing a new
/// statement drops the previous one along with any rows it had not handed out.
#[derive(Debug)]
pub struct Database {
    pub(super) config: ConnectionConfig,
    pub(super) conn: Option<DbConnection>,
    pub(super) statement: Option<Statement>,
}

impl Database {
    /// Store `config` without connecting.
    #[must_use]
    pub fn new(config: impl Into<ConnectionConfig>) -> Self {
        Self {
            config: config.into(),
            conn: None,
            statement: None,
        }
    }

    /// Parse `dsn` (see [`ConnectionConfig`]) without connecting.
    ///
    /// # Errors
    /// Returns `DatabaseError::Config` if the DSN cannot be parsed.
    pub fn from_dsn(dsn: &str) -> Result<Self, DatabaseError> {
        Ok(Self::new(dsn.parse::<ConnectionConfig>()?))
    }

    /// Open a new connection using the stored configuration.
    ///
    /// Any previous connection is dropped once the new one is open, together
    /// with its prepared statement.
    ///
    /// # Errors
    /// Returns the driver's error if the connection cannot be opened; the
    /// previous connection, if any, is kept in that case.
    pub fn connect(&mut self) -> Result<&mut Self, DatabaseError> {
        tracing::debug!(config = %self.config, "connecting");
        let conn = DbConnection::open(&self.config)?;
        self.statement = None;
        self.conn = Some(conn);
        Ok(self)
    }

    /// Replace the stored configuration, then [`connect`](Self::connect).
    ///
    /// # Errors
    /// Returns the driver's error if the connection cannot be opened.
    pub fn connect_with(
        &mut self,
        config: impl Into<ConnectionConfig>,
    ) -> Result<&mut Self, DatabaseError> {
        self.config = config.into();
        self.connect()
    }

    /// The raw driver connection, if connected.
    #[must_use]
    pub fn db(&self) -> Option<&DbConnection> {
        self.conn.as_ref()
    }

    pub fn db_mut(&mut self) -> Option<&mut DbConnection> {
        self.conn.as_mut()
    }

    #[must_use]
    pub fn connection_config(&self) -> &ConnectionConfig {
        &self.config
    }

    #[must_use]
    pub fn driver(&self) -> Driver {
        self.config.driver()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub(super) fn conn(&self) -> Result<&DbConnection, DatabaseError> {
        self.conn.as_ref().ok_or_else(DatabaseError::not_connected)
    }

    pub(super) fn conn_mut(&mut self) -> Result<&mut DbConnection, DatabaseError> {
        self.conn.as_mut().ok_or_else(DatabaseError::not_connected)
    }
}
