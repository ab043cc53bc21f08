//! Append-only discrepancy log.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{FloracheckError, Result};

use super::entry::{DiscrepancyEntry, DiscrepancyKind};

/// Ordered findings of one reconciliation run.
///
/// Entries are never removed, merged or deduplicated. Nothing touches the
/// filesystem until [`flush`](Self::flush).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscrepancyLog {
    entries: Vec<DiscrepancyEntry>,
}

impl DiscrepancyLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: DiscrepancyEntry) {
        self.entries.push(entry);
    }

    /// Entries in append order.
    pub fn entries(&self) -> &[DiscrepancyEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of one kind.
    pub fn count(&self, kind: DiscrepancyKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Entry counts keyed by kind. Kinds with no entries are omitted.
    pub fn counts_by_kind(&self) -> BTreeMap<DiscrepancyKind, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Entries for one taxon.
    pub fn for_taxon<'a>(&'a self, taxon: &'a str) -> impl Iterator<Item = &'a DiscrepancyEntry> + 'a {
        self.entries.iter().filter(move |e| e.taxon == taxon)
    }

    /// Write the tab-delimited report to any writer.
    ///
    /// One line per entry: taxon, message, then each detail. Fields are
    /// written as-is, never quoted.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);
        for entry in &self.entries {
            let mut record = vec![entry.taxon.as_str(), entry.message.as_str()];
            record.extend(entry.details.iter().map(String::as_str));
            writer.write_record(&record)?;
        }
        writer
            .flush()
            .map_err(|e| FloracheckError::Persistence(format!("Failed to write report: {}", e)))?;
        Ok(())
    }

    /// Write the report to a file, creating parent directories.
    pub fn flush(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    FloracheckError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            FloracheckError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
        })?;
        self.write_to(BufWriter::new(file))?;
        info!(path = %path.display(), entries = self.entries.len(), "wrote discrepancy report");
        Ok(())
    }
}

impl Extend<DiscrepancyEntry> for DiscrepancyLog {
    fn extend<T: IntoIterator<Item = DiscrepancyEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}
