//! A fluent, chainable adapter over SQL database drivers.
//!
//! One [`Database`] value holds a connection configuration, the open
//! connection and the most recently prepared statement. Mutating calls return
//! the adapter so they chain; fetch calls hand rows out as values in column
//! order, as maps keyed by column name, or deserialized into your own types.
//!
//! ```rust
//! use tietokanta::prelude::*;
//!
//! let mut db = Database::from_dsn("sqlite::memory:")?;
//! db.connect()?
//!     .exec("CREATE TABLE kissat (id INTEGER PRIMARY KEY, nimi TEXT NOT NULL)")?
//!     .prepare("INSERT INTO kissat (nimi) VALUES (:nimi)")?
//!     .execute(Params::named().with("nimi", "Mirri"))?
//!     .execute(Params::named().with("nimi", "Katti"))?;
//!
//! let names = db
//!     .query_parameters("SELECT nimi FROM kissat WHERE id > ?", vec![SqlValue::Int(0)])?
//!     .fetch_numeric_rows()?;
//! assert_eq!(names.len(), 2);
//! # Ok::<(), DatabaseError>(())
//! ```
//!
//! Drivers are selected by cargo feature: `sqlite` (default, rusqlite) and
//! `postgres` (tokio-postgres, run on a private blocking runtime).

pub mod config;
pub mod connection;
pub mod database;
pub mod error;
pub mod params;
pub mod prelude;
pub mod results;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{ConnectionConfig, PostgresOptions, SqliteOptions};
pub use connection::DbConnection;
pub use database::{Database, Statement};
pub use error::DatabaseError;
pub use params::Params;
pub use results::{AssociativeRow, ResultSet};
pub use types::{Driver, SqlValue};
