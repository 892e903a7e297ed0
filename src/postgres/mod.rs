// PostgreSQL driver, built on tokio-postgres and driven to completion on a
// current-thread runtime owned by each connection.
//
// - connection: connecting, transactions, quoting and prepared statements
// - params: `ToSql` for `SqlValue`
// - query: turning tokio-postgres rows into a `ResultSet`

pub mod connection;
pub mod params;
pub mod query;

pub use connection::{PostgresConnection, PostgresStatement};
pub use query::{build_result_set, postgres_extract_value};
