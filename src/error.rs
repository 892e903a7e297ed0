use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;
#[cfg(feature = "postgres")]
use tokio_postgres;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("No statement has been prepared")]
    NoStatement,

    #[error("Parameter error: {0}")]
    Parameter(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Row decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DatabaseError {
    pub(crate) fn not_connected() -> Self {
        DatabaseError::Connection("not connected; call connect() first".to_string())
    }
}
