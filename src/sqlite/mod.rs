// SQLite driver, built on rusqlite.
//
// - connection: opening, transactions, quoting and the statement cache
// - params: binding `Params` to rusqlite statements
// - query: turning rusqlite rows into a `ResultSet`

pub mod connection;
pub mod params;
pub mod query;

pub use connection::{SqliteConnection, SqliteStatement};
pub use params::{bind_params, to_sqlite_value};
pub use query::{build_result_set, sqlite_extract_value};
