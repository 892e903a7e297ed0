use crate::error::DatabaseError;

use super::core::Database;

impl Database {
    /// Begin a transaction.
    ///
    /// # Errors
    /// Returns `DatabaseError::Transaction` if one is already active, or the
    /// driver's error.
    pub fn begin(&mut self) -> Result<&mut Self, DatabaseError> {
        tracing::debug!("begin transaction");
        self.conn_mut()?.begin()?;
        Ok(self)
    }

    /// Commit the active transaction.
    ///
    /// # Errors
    /// Returns `DatabaseError::Transaction` if none is active, or the driver's error.
    pub fn commit(&mut self) -> Result<&mut Self, DatabaseError> {
        tracing::debug!("commit transaction");
        self.conn_mut()?.commit()?;
        Ok(self)
    }

    /// Roll back the active transaction.
    ///
    /// # Errors
    /// Returns `DatabaseError::Transaction` if none is active, or the driver's error.
    pub fn rollback(&mut self) -> Result<&mut Self, DatabaseError> {
        tracing::debug!("rollback transaction");
        self.conn_mut()?.rollback()?;
        Ok(self)
    }

    /// Whether a transaction is active on the current connection.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.conn.as_ref().is_some_and(|c| c.in_transaction())
    }
}
