use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::DatabaseError;
use crate::types::SqlValue;

/// A key-to-value row.
pub type AssociativeRow = BTreeMap<String, SqlValue>;

/// Rows produced by one execution of a statement, consumed front to back by
/// the fetch methods.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// Column names shared by all rows
    column_names: Arc<Vec<String>>,
    rows: VecDeque<Vec<SqlValue>>,
    /// Rows affected by a data-modifying statement
    rows_affected: usize,
}

impl ResultSet {
    /// Create a result set with a known capacity
    #[must_use]
    pub fn with_capacity(column_names: Arc<Vec<String>>, capacity: usize) -> Self {
        Self {
            column_names,
            rows: VecDeque::with_capacity(capacity),
            rows_affected: 0,
        }
    }

    /// Result of a statement that returns no rows.
    #[must_use]
    pub fn affected(rows_affected: usize) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    pub fn push_row(&mut self, row_values: Vec<SqlValue>) {
        self.rows.push_back(row_values);
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    #[must_use]
    pub fn rows_affected(&self) -> usize {
        self.rows_affected
    }

    /// Rows not yet fetched.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn next_numeric(&mut self) -> Option<Vec<SqlValue>> {
        self.rows.pop_front()
    }

    pub fn next_associative(&mut self) -> Option<AssociativeRow> {
        let row = self.rows.pop_front()?;
        Some(associate(&self.column_names, row))
    }

    /// # Errors
    /// Returns `DatabaseError::Decode` if the row does not fit `T`.
    pub fn next_object<T: DeserializeOwned>(&mut self) -> Result<Option<T>, DatabaseError> {
        self.rows
            .pop_front()
            .map(|row| objectify(&self.column_names, &row))
            .transpose()
    }

    pub fn drain_numeric(&mut self) -> Vec<Vec<SqlValue>> {
        self.rows.drain(..).collect()
    }

    pub fn drain_associative(&mut self) -> Vec<AssociativeRow> {
        let columns = Arc::clone(&self.column_names);
        self.rows
            .drain(..)
            .map(|row| associate(&columns, row))
            .collect()
    }

    /// # Errors
    /// Returns `DatabaseError::Decode` on the first row that does not fit `T`;
    /// all remaining rows are consumed either way.
    pub fn drain_objects<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, DatabaseError> {
        let columns = Arc::clone(&self.column_names);
        let rows: Vec<_> = self.rows.drain(..).collect();
        rows.iter().map(|row| objectify(&columns, row)).collect()
    }
}

/// Pair values with their column names; later duplicates win.
fn associate(columns: &[String], row: Vec<SqlValue>) -> AssociativeRow {
    columns.iter().cloned().zip(row).collect()
}

fn objectify<T: DeserializeOwned>(
    columns: &[String],
    row: &[SqlValue],
) -> Result<T, DatabaseError> {
    let object: serde_json::Map<String, serde_json::Value> = columns
        .iter()
        .zip(row)
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect();
    Ok(serde_json::from_value(serde_json::Value::Object(object))?)
}
