//! Checklist changes proposed by a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::fields::Field;

/// Field values to write back to the checklist, keyed by taxon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSet {
    source: String,
    changes: BTreeMap<String, BTreeMap<Field, String>>,
}

impl UpdateSet {
    /// Create an empty update set for a source.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            changes: BTreeMap::new(),
        }
    }

    /// Source the values came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Record a new value. A later value for the same cell replaces it.
    pub fn insert(&mut self, taxon: impl Into<String>, field: Field, value: impl Into<String>) {
        self.changes
            .entry(taxon.into())
            .or_default()
            .insert(field, value.into());
    }

    /// Proposed value for one cell.
    pub fn get(&self, taxon: &str, field: Field) -> Option<&str> {
        self.changes.get(taxon)?.get(&field).map(String::as_str)
    }

    /// Changes grouped by taxon, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<Field, String>)> {
        self.changes.iter()
    }

    /// Number of taxa with changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Total number of changed cells.
    pub fn change_count(&self) -> usize {
        self.changes.values().map(BTreeMap::len).sum()
    }

    /// Whether nothing would change.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
