use crate::error::DatabaseError;
use crate::types::SqlValue;

/// Values to bind to a prepared statement.
///
/// Positional values fill `?` / `?N` placeholders in order; named values fill
/// `:name` placeholders. Names may be given with or without their sigil.
/// ```rust
/// use tietokanta::prelude::*;
///
/// let by_position = Params::from(vec![SqlValue::Int(1), SqlValue::Text("a".into())]);
/// let by_name = Params::named().with("id", 1).with(":label", "a");
/// # let _ = (by_position, by_name);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    /// No parameters
    #[default]
    None,
    /// Ordered values
    Positional(Vec<SqlValue>),
    /// Keyed values, in insertion order
    Named(Vec<(String, SqlValue)>),
}

impl Params {
    /// An empty keyed collection to fill with [`Params::with`].
    #[must_use]
    pub fn named() -> Self {
        Params::Named(Vec::new())
    }

    /// Add a keyed value, replacing an earlier value bound to the same name.
    ///
    /// Positional values already present are kept under their 1-based index
    /// (`"1"`, `"2"`, ...). No placeholder takes such a name, so executing a
    /// mix of positional and keyed values fails with a parameter error instead
    /// of silently binding by position.
    #[must_use]
    pub fn with(self, name: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        let mut pairs = match self {
            Params::None => Vec::new(),
            Params::Positional(values) => values
                .into_iter()
                .enumerate()
                .map(|(idx, v)| ((idx + 1).to_string(), v))
                .collect(),
            Params::Named(pairs) => pairs,
        };
        let key = bare_name(name);
        if let Some(slot) = pairs.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            pairs.push((key.to_string(), value));
        }
        Params::Named(pairs)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Params::None => 0,
            Params::Positional(values) => values.len(),
            Params::Named(pairs) => pairs.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a keyed value; the name may carry its sigil.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&SqlValue> {
        let key = bare_name(name);
        match self {
            Params::Named(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Arrange values in the order given by `names`, the placeholder names of a
    /// statement in the order the driver numbers them.
    ///
    /// # Errors
    /// Returns `DatabaseError::Parameter` when a name has no value, a value has
    /// no placeholder, or positional values are given for a statement that
    /// uses names.
    pub fn ordered_by(&self, names: &[String]) -> Result<Vec<SqlValue>, DatabaseError> {
        match self {
            Params::None if names.is_empty() => Ok(Vec::new()),
            Params::Positional(values) => {
                if names.is_empty() {
                    Ok(values.clone())
                } else {
                    Err(DatabaseError::Parameter(
                        "statement uses named placeholders; bind values by name".into(),
                    ))
                }
            }
            Params::Named(pairs) => {
                if let Some((extra, _)) = pairs.iter().find(|(k, _)| !names.contains(k)) {
                    return Err(DatabaseError::Parameter(format!(
                        "no placeholder named :{extra}"
                    )));
                }
                names
                    .iter()
                    .map(|name| {
                        self.get_named(name).cloned().ok_or_else(|| {
                            DatabaseError::Parameter(format!("no value bound for :{name}"))
                        })
                    })
                    .collect()
            }
            Params::None => Err(DatabaseError::Parameter(format!(
                "no value bound for :{}",
                names.first().map_or("", String::as_str)
            ))),
        }
    }
}

/// Strip a leading `:`, `@` or `$` from a parameter name.
pub(crate) fn bare_name(name: &str) -> &str {
    name.strip_prefix([':', '@', '$']).unwrap_or(name)
}

impl From<Vec<SqlValue>> for Params {
    fn from(values: Vec<SqlValue>) -> Self {
        Params::Positional(values)
    }
}

impl From<&[SqlValue]> for Params {
    fn from(values: &[SqlValue]) -> Self {
        Params::Positional(values.to_vec())
    }
}

impl<const N: usize> From<[SqlValue; N]> for Params {
    fn from(values: [SqlValue; N]) -> Self {
        Params::Positional(values.to_vec())
    }
}

impl<K: Into<String>> From<Vec<(K, SqlValue)>> for Params {
    fn from(pairs: Vec<(K, SqlValue)>) -> Self {
        pairs.into_iter().fold(Params::named(), |acc, (k, v)| {
            let key: String = k.into();
            acc.with(&key, v)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_ignore_sigils() {
        let p = Params::named().with(":id", 7).with("name", "x");
        assert_eq!(p.get_named("id"), Some(&SqlValue::Int(7)));
        assert_eq!(p.get_named(":name"), Some(&SqlValue::Text("x".into())));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn rebinding_a_name_replaces_it() {
        let p = Params::named().with("id", 1).with(":id", 2);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get_named("id"), Some(&SqlValue::Int(2)));
    }

    #[test]
    fn ordered_by_names() {
        let p = Params::named().with("b", 2).with("a", 1);
        let ordered = p.ordered_by(&["a".into(), "b".into(), "a".into()]).unwrap();
        assert_eq!(ordered, vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(1)]);
    }

    #[test]
    fn ordered_by_reports_missing_name() {
        let p = Params::named().with("a", 1);
        let err = p.ordered_by(&["a".into(), "missing".into()]).unwrap_err();
        assert!(err.to_string().contains(":missing"));
    }

    #[test]
    fn positional_values_for_named_statement_are_rejected() {
        let p = Params::from(vec![SqlValue::Int(1)]);
        assert!(p.ordered_by(&["a".into()]).is_err());
        assert_eq!(p.ordered_by(&[]).unwrap(), vec![SqlValue::Int(1)]);
    }

    #[test]
    fn keyed_value_on_positional_values_keeps_them_by_index() {
        let p = Params::from(vec![SqlValue::Int(1), SqlValue::Int(2)]).with(":a", 3);
        assert_eq!(
            p,
            Params::Named(vec![
                ("1".into(), SqlValue::Int(1)),
                ("2".into(), SqlValue::Int(2)),
                ("a".into(), SqlValue::Int(3)),
            ])
        );
        let err = p.ordered_by(&["a".into()]).unwrap_err();
        assert!(err.to_string().contains(":1"));

        let p = Params::from(Vec::<SqlValue>::new()).with("a", 3);
        assert_eq!(p.ordered_by(&["a".into()]).unwrap(), vec![SqlValue::Int(3)]);
    }

    #[test]
    fn ordered_by_reports_unused_name() {
        let p = Params::named().with("a", 1).with("typo", 2);
        let err = p.ordered_by(&["a".into()]).unwrap_err();
        assert!(err.to_string().contains(":typo"));
        assert!(Params::None.ordered_by(&["a".into()]).is_err());
    }
}
