use serde::de::DeserializeOwned;

use crate::error::DatabaseError;
use crate::results::{AssociativeRow, ResultSet};
use crate::types::SqlValue;

use super::core::Database;

impl Database {
    /// Next row deserialized into `T`, matching columns to fields by name.
    ///
    /// ```rust
    /// use serde::Deserialize;
    /// use tietokanta::prelude::*;
    ///
    /// #[derive(Deserialize)]
    /// struct Greeting {
    ///     id: i64,
    ///     text: String,
    /// }
    ///
    /// let mut db = Database::from_dsn("sqlite::memory:")?;
    /// let greeting: Option<Greeting> = db
    ///     .connect()?
    ///     .query("SELECT 1 AS id, 'hei' AS text")?
    ///     .fetch_object()?;
    /// assert_eq!(greeting.map(|g| (g.id, g.text)), Some((1, "hei".to_string())));
    /// # Ok::<(), DatabaseError>(())
    /// ```
    ///
    /// # Errors
    /// Returns `DatabaseError::NoStatement` if nothing is prepared, or
    /// `DatabaseError::Decode` if the row does not fit `T`.
    pub fn fetch_object<T: DeserializeOwned>(&mut self) -> Result<Option<T>, DatabaseError> {
        match self.results_mut()? {
            Some(results) => results.next_object(),
            None => Ok(None),
        }
    }

    /// Next row as values in column order.
    ///
    /// # Errors
    /// Returns `DatabaseError::NoStatement` if nothing is prepared.
    pub fn fetch_numeric_row(&mut self) -> Result<Option<Vec<SqlValue>>, DatabaseError> {
        Ok(self.results_mut()?.and_then(ResultSet::next_numeric))
    }

    /// Next row keyed by column name.
    ///
    /// # Errors
    /// Returns `DatabaseError::NoStatement` if nothing is prepared.
    pub fn fetch_associative_row(&mut self) -> Result<Option<AssociativeRow>, DatabaseError> {
        Ok(self.results_mut()?.and_then(ResultSet::next_associative))
    }

    /// All remaining rows as values in column order.
    ///
    /// # Errors
    /// Returns `DatabaseError::NoStatement` if nothing is prepared.
    pub fn fetch_numeric_rows(&mut self) -> Result<Vec<Vec<SqlValue>>, DatabaseError> {
        Ok(self
            .results_mut()?
            .map(ResultSet::drain_numeric)
            .unwrap_or_default())
    }

    /// All remaining rows keyed by column name.
    ///
    /// # Errors
    /// Returns `DatabaseError::NoStatement` if nothing is prepared.
    pub fn fetch_associative_rows(&mut self) -> Result<Vec<AssociativeRow>, DatabaseError> {
        Ok(self
            .results_mut()?
            .map(ResultSet::drain_associative)
            .unwrap_or_default())
    }

    /// All remaining rows deserialized into `T`.
    ///
    /// # Errors
    /// Returns `DatabaseError::NoStatement` if nothing is prepared, or
    /// `DatabaseError::Decode` if a row does not fit `T`.
    pub fn fetch_objects<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, DatabaseError> {
        match self.results_mut()? {
            Some(results) => results.drain_objects(),
            None => Ok(Vec::new()),
        }
    }
}
