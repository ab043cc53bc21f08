//! Source adapters.

use crate::error::Result;

use super::record::{SourceIndex, SourceRecord};

/// Supplies one authority's full view of its taxa.
///
/// `fetch` returns a complete snapshot before any comparison starts.
pub trait SourceAdapter {
    /// Source id the snapshot belongs to.
    fn source_id(&self) -> &str;

    /// Produce the snapshot.
    fn fetch(&self) -> Result<SourceIndex>;
}

/// Adapter over records held in memory.
#[derive(Debug, Clone)]
pub struct StaticAdapter {
    source: String,
    records: Vec<SourceRecord>,
}

impl StaticAdapter {
    /// Create an adapter with no records.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            records: Vec::new(),
        }
    }

    /// Add a record.
    pub fn with_record(mut self, record: SourceRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Add several records.
    pub fn with_records(mut self, records: impl IntoIterator<Item = SourceRecord>) -> Self {
        self.records.extend(records);
        self
    }
}

impl SourceAdapter for StaticAdapter {
    fn source_id(&self) -> &str {
        &self.source
    }

    fn fetch(&self) -> Result<SourceIndex> {
        let mut index = SourceIndex::new(self.source.clone());
        for record in &self.records {
            index.insert(record.clone());
        }
        Ok(index)
    }
}
