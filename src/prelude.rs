//! Convenient imports for common functionality.

pub use crate::config::{
    ConnectionConfig, PostgresOptions, PostgresOptionsBuilder, SqliteOptions,
    SqliteOptionsBuilder,
};
pub use crate::connection::DbConnection;
pub use crate::database::Database;
pub use crate::error::DatabaseError;
pub use crate::params::Params;
pub use crate::results::AssociativeRow;
pub use crate::types::{Driver, SqlValue};
