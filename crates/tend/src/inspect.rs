//! Schema inspection.
//!
//! Reads the live catalog on every call. Schema state can change
//! between runs by external actors, so nothing here is cached.

use std::collections::BTreeSet;

use crate::Result;
use crate::conn::Connection;
use crate::error::Error;

/// The set of column names currently present on a table.
///
/// Postgres folds unquoted identifiers to lowercase; membership tests
/// fold both sides so `Ward_No` and `ward_no` compare equal.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    names: BTreeSet<String>,
}

impl ColumnSet {
    /// Build a set from catalog-reported names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(|n| n.into().to_lowercase()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Record a column added during this run, so a desired list with
    /// duplicate entries does not attempt a double-add.
    pub fn insert(&mut self, name: &str) {
        self.names.insert(name.to_lowercase());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Fetch the columns of `table` as the catalog reports them right now.
///
/// Fatal on a missing table or a failing catalog query; there is no
/// partial inspection.
pub async fn existing_columns(conn: &dyn Connection, table: &str) -> Result<ColumnSet> {
    match conn.table_columns(table).await {
        Ok(Some(names)) => Ok(ColumnSet::from_names(names)),
        Ok(None) => Err(Error::NoSuchTable(table.to_string())),
        Err(source) => Err(Error::SchemaQuery {
            table: table.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_folds_case() {
        let set = ColumnSet::from_names(["ID", "Email", "ward_no"]);
        assert!(set.contains("id"));
        assert!(set.contains("EMAIL"));
        assert!(set.contains("Ward_No"));
        assert!(!set.contains("municipality"));
    }

    #[test]
    fn test_insert_dedupes_across_case() {
        let mut set = ColumnSet::default();
        set.insert("municipality");
        set.insert("MUNICIPALITY");
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["municipality"]);
    }
}
