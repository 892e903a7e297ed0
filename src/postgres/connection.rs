use std::fmt;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio_postgres::{Client, NoTls, Statement};

use crate::config::PostgresOptions;
use crate::connection::quote_literal;
use crate::error::DatabaseError;
use crate::params::Params;
use crate::results::ResultSet;
use crate::translation::to_postgres_placeholders;

use super::params::as_refs;
use super::query::build_result_set;

/// A blocking `PostgreSQL` session.
///
/// tokio-postgres is asynchronous; each connection owns a current-thread
/// runtime and blocks on it for every call. The connection future runs as a
/// task on that runtime and makes progress whenever a call is in flight.
pub struct PostgresConnection {
    runtime: Runtime,
    client: Client,
    in_transaction: bool,
}

/// A server-side prepared statement plus the placeholder names it was
/// translated from.
#[derive(Clone)]
pub struct PostgresStatement {
    statement: Statement,
    names: Vec<String>,
    column_names: Arc<Vec<String>>,
}

impl PostgresStatement {
    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Placeholder names in `$N` order; empty for positional statements.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }
}

impl fmt::Debug for PostgresStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStatement")
            .field("names", &self.names)
            .field("column_names", &self.column_names)
            .finish_non_exhaustive()
    }
}

impl PostgresConnection {
    /// Connect using `opts`.
    ///
    /// # Errors
    /// Returns `DatabaseError::Connection` if the runtime cannot be built, or
    /// `DatabaseError::Postgres` if the server cannot be reached or rejects the login.
    pub fn connect(opts: &PostgresOptions) -> Result<Self, DatabaseError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                DatabaseError::Connection(format!("Failed to build Postgres runtime: {e}"))
            })?;

        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&opts.host)
            .port(opts.port)
            .dbname(&opts.dbname)
            .user(&opts.user);
        if let Some(password) = &opts.password {
            pg_config.password(password);
        }
        if let Some(name) = &opts.application_name {
            pg_config.application_name(name);
        }

        let (client, connection) = runtime.block_on(pg_config.connect(NoTls))?;
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "postgres connection closed with error");
            }
        });

        Ok(Self {
            runtime,
            client,
            in_transaction: false,
        })
    }

    /// Borrow the underlying tokio-postgres client. Futures it returns must be
    /// driven with [`PostgresConnection::block_on`].
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Drive a future on this connection's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Translate `?` / `:name` placeholders and prepare the statement on the server.
    ///
    /// # Errors
    /// Returns `DatabaseError::Parameter` for mixed placeholder styles, or
    /// `DatabaseError::Postgres` if the server rejects the statement.
    pub fn prepare(&self, sql: &str) -> Result<PostgresStatement, DatabaseError> {
        let translated = to_postgres_placeholders(sql)?;
        let statement = self.block_on(self.client.prepare(&translated.sql))?;
        let column_names = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();
        Ok(PostgresStatement {
            statement,
            names: translated.names,
            column_names: Arc::new(column_names),
        })
    }

    /// Bind `params` and run `stmt`, buffering its rows.
    ///
    /// # Errors
    /// Returns `DatabaseError::Parameter` if named values are missing, or
    /// `DatabaseError::Postgres` if execution fails.
    pub fn execute(
        &self,
        stmt: &PostgresStatement,
        params: &Params,
    ) -> Result<ResultSet, DatabaseError> {
        let values = params.ordered_by(&stmt.names)?;
        let refs = as_refs(&values);
        if stmt.column_names.is_empty() {
            let affected = self.block_on(self.client.execute(&stmt.statement, &refs))?;
            return Ok(ResultSet::affected(
                usize::try_from(affected).unwrap_or(usize::MAX),
            ));
        }
        let rows = self.block_on(self.client.query(&stmt.statement, &refs))?;
        build_result_set(Arc::clone(&stmt.column_names), &rows)
    }

    /// Run one or more statements, discarding any rows.
    ///
    /// # Errors
    /// Returns `DatabaseError::Postgres` if any statement fails.
    pub fn execute_batch(&self, sql: &str) -> Result<(), DatabaseError> {
        self.block_on(self.client.batch_execute(sql))?;
        Ok(())
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// # Errors
    /// Returns `DatabaseError::Transaction` if a transaction is already active.
    pub fn begin(&mut self) -> Result<(), DatabaseError> {
        if self.in_transaction {
            return Err(DatabaseError::Transaction(
                "Postgres transaction already in progress".into(),
            ));
        }
        self.execute_batch("BEGIN")?;
        self.in_transaction = true;
        Ok(())
    }

    /// # Errors
    /// Returns `DatabaseError::Transaction` if no transaction is active.
    pub fn commit(&mut self) -> Result<(), DatabaseError> {
        if !self.in_transaction {
            return Err(DatabaseError::Transaction(
                "Postgres transaction not active".into(),
            ));
        }
        // COMMIT of an aborted transaction rolls back; either way it has ended.
        self.in_transaction = false;
        self.execute_batch("COMMIT")
    }

    /// # Errors
    /// Returns `DatabaseError::Transaction` if no transaction is active.
    pub fn rollback(&mut self) -> Result<(), DatabaseError> {
        if !self.in_transaction {
            return Err(DatabaseError::Transaction(
                "Postgres transaction not active".into(),
            ));
        }
        self.in_transaction = false;
        self.execute_batch("ROLLBACK")
    }

    /// Quote as a standard-conforming string literal, switching to the `E'...'`
    /// escape form when the literal contains backslashes.
    #[must_use]
    pub fn quote(&self, literal: &str) -> Option<String> {
        quote_literal(literal, true)
    }

    /// The value most recently produced by a sequence in this session.
    ///
    /// # Errors
    /// Returns `DatabaseError::Postgres` if no sequence has been used yet.
    pub fn last_insert_id(&self) -> Result<i64, DatabaseError> {
        let row = self.block_on(self.client.query_one("SELECT lastval()", &[]))?;
        Ok(row.try_get(0)?)
    }
}

impl fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("closed", &self.client.is_closed())
            .field("in_transaction", &self.in_transaction)
            .finish_non_exhaustive()
    }
}
