use crate::connection::StatementHandle;
use crate::error::DatabaseError;
use crate::params::Params;
use crate::results::ResultSet;

use super::core::Database;

/// The statement most recently prepared on a [`Database`], with the rows of
/// its latest execution.
#[derive(Debug)]
pub struct Statement {
    sql: String,
    handle: StatementHandle,
    results: Option<ResultSet>,
}

impl Statement {
    /// The statement text as given to `prepare`.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn handle(&self) -> &StatementHandle {
        &self.handle
    }

    /// Rows of the latest execution; `None` before the first one.
    #[must_use]
    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }
}

impl Database {
    /// Compile `statement`, replacing the previously prepared one.
    ///
    /// # Errors
    /// Returns the driver's error if the statement does not compile.
    pub fn prepare(&mut self, statement: &str) -> Result<&mut Self, DatabaseError> {
        tracing::debug!(sql = statement, "prepare");
        self.statement = None;
        let handle = self.conn()?.prepare(statement)?;
        self.statement = Some(Statement {
            sql: statement.to_string(),
            handle,
            results: None,
        });
        Ok(self)
    }

    /// Bind `parameters` to the prepared statement and run it. Rows left over
    /// from a previous execution are discarded.
    ///
    /// # Errors
    /// Returns `DatabaseError::NoStatement` if nothing is prepared, or the
    /// driver's binding or execution error.
    pub fn execute(&mut self, parameters: impl Into<Params>) -> Result<&mut Self, DatabaseError> {
        let params = parameters.into();
        let conn = self.conn.as_ref().ok_or_else(DatabaseError::not_connected)?;
        let stmt = self.statement.as_mut().ok_or(DatabaseError::NoStatement)?;
        stmt.results = None;
        let results = conn.execute(&stmt.handle, &params)?;
        tracing::trace!(
            params = params.len(),
            rows = results.remaining(),
            affected = results.rows_affected(),
            "execute"
        );
        stmt.results = Some(results);
        Ok(self)
    }

    /// Prepare `statement` and run it without parameters.
    ///
    /// # Errors
    /// Returns the driver's error from either step.
    pub fn query(&mut self, statement: &str) -> Result<&mut Self, DatabaseError> {
        self.prepare(statement)?.execute(Params::None)
    }

    /// Prepare `statement` and run it with `parameters`.
    ///
    /// # Errors
    /// Returns the driver's error from either step.
    pub fn query_parameters(
        &mut self,
        statement: &str,
        parameters: impl Into<Params>,
    ) -> Result<&mut Self, DatabaseError> {
        self.prepare(statement)?.execute(parameters)
    }

    /// Run one or more `;`-separated statements that return no rows, such as
    /// schema setup. The prepared statement is left untouched.
    ///
    /// # Errors
    /// Returns the driver's error.
    pub fn exec(&mut self, sql: &str) -> Result<&mut Self, DatabaseError> {
        tracing::debug!(sql, "exec batch");
        self.conn()?.execute_batch(sql)?;
        Ok(self)
    }

    /// Quote `literal` for inline use in a statement. `Ok(None)` when the
    /// driver cannot represent the literal.
    ///
    /// # Errors
    /// Returns `DatabaseError::Connection` if not connected.
    pub fn quote(&self, literal: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.conn()?.quote(literal))
    }

    /// Rows changed by the last executed data-modifying statement.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.statement
            .as_ref()
            .and_then(|s| s.results.as_ref())
            .map_or(0, ResultSet::rows_affected)
    }

    /// Result columns of the prepared statement; 0 when nothing is prepared.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_names().len()
    }

    /// Column names of the latest execution, or of the prepared statement
    /// before it has run.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.statement.as_ref().map_or(&[] as &[String], |s| {
            match s.results.as_ref() {
                Some(results) if !results.column_names().is_empty() => results.column_names(),
                _ => s.handle.column_names(),
            }
        })
    }

    /// The id of the most recently inserted row.
    ///
    /// # Errors
    /// Returns `DatabaseError::Connection` if not connected, or the driver's error.
    pub fn last_insert_id(&self) -> Result<i64, DatabaseError> {
        self.conn()?.last_insert_id()
    }

    /// The prepared statement, if any.
    #[must_use]
    pub fn statement(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }

    pub(super) fn results_mut(&mut self) -> Result<Option<&mut ResultSet>, DatabaseError> {
        let stmt = self.statement.as_mut().ok_or(DatabaseError::NoStatement)?;
        Ok(stmt.results.as_mut())
    }
}
