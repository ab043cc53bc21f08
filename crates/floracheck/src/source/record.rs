//! One authority's records.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A taxon as one authority lists it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Name as the authority spells it; the index key.
    pub name: String,
    /// Raw native-status code, interpreted through the profile's status table.
    pub native: Option<String>,
    pub id: Option<String>,
    pub rarity: Option<String>,
    pub legal: BTreeSet<String>,
    pub presence: BTreeSet<String>,
}

impl SourceRecord {
    /// Create a record with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the raw native-status code.
    pub fn with_native(mut self, native: impl Into<String>) -> Self {
        self.native = Some(native.into());
        self
    }

    /// Set the external id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the rarity code.
    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    /// Add a legal-status code.
    pub fn with_legal(mut self, code: impl Into<String>) -> Self {
        self.legal.insert(code.into());
        self
    }

    /// Add a presence code.
    pub fn with_presence(mut self, code: impl Into<String>) -> Self {
        self.presence.insert(code.into());
        self
    }
}

/// Where a snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub source: String,
    /// Snapshot file, when file-backed.
    pub origin: Option<PathBuf>,
    /// SHA-256 of the snapshot file contents.
    pub hash: Option<String>,
    pub record_count: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Every record an authority lists, keyed by its spelling of the name.
#[derive(Debug, Clone)]
pub struct SourceIndex {
    pub source: String,
    records: BTreeMap<String, SourceRecord>,
    pub metadata: SnapshotMetadata,
}

impl SourceIndex {
    /// Create an empty in-memory index.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            metadata: SnapshotMetadata {
                source: source.clone(),
                origin: None,
                hash: None,
                record_count: 0,
                loaded_at: Utc::now(),
            },
            source,
            records: BTreeMap::new(),
        }
    }

    /// Record the snapshot file and its hash.
    pub fn with_origin(mut self, origin: PathBuf, hash: String) -> Self {
        self.metadata.origin = Some(origin);
        self.metadata.hash = Some(hash);
        self
    }

    /// Add a record. A repeated name keeps the first record.
    pub fn insert(&mut self, record: SourceRecord) -> bool {
        if self.records.contains_key(&record.name) {
            warn!(source = %self.source, name = %record.name, "duplicate source record ignored");
            return false;
        }
        self.records.insert(record.name.clone(), record);
        self.metadata.record_count = self.records.len();
        true
    }

    /// Look up a record by the source's spelling.
    pub fn get(&self, name: &str) -> Option<&SourceRecord> {
        self.records.get(name)
    }

    /// Whether a name is listed.
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Records in name order.
    pub fn records(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.values()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
