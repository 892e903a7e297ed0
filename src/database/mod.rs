mod core;
mod fetch;
mod prepared;
mod tx;

pub use self::core::Database;
pub use prepared::Statement;
