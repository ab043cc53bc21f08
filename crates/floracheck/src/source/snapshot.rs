//! Snapshot files produced by an external downloader.
//!
//! A snapshot is a TSV with a header row. Only `name` is required:
//!
//! ```text
//! name	native	id	rarity	legal	presence
//! Salvia apiana	native	7392			SDG,RIV
//! ```
//!
//! `legal` and `presence` are `,`-separated.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{FloracheckError, Result};

use super::adapter::SourceAdapter;
use super::record::{SourceIndex, SourceRecord};

/// Adapter reading a TSV snapshot from disk.
#[derive(Debug, Clone)]
pub struct SnapshotAdapter {
    source: String,
    path: PathBuf,
}

impl SnapshotAdapter {
    /// Create an adapter for a snapshot file.
    pub fn new(source: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
        }
    }

    /// Snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn source_error(&self, message: impl Into<String>) -> FloracheckError {
        FloracheckError::Source {
            source_id: self.source.clone(),
            message: message.into(),
        }
    }
}

impl SourceAdapter for SnapshotAdapter {
    fn source_id(&self) -> &str {
        &self.source
    }

    fn fetch(&self) -> Result<SourceIndex> {
        let mut file = File::open(&self.path).map_err(|e| {
            self.source_error(format!("cannot open '{}': {}", self.path.display(), e))
        })?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| FloracheckError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let index = parse_snapshot(&self.source, &contents)?.with_origin(self.path.clone(), hash);

        info!(
            source = %self.source,
            records = index.len(),
            path = %self.path.display(),
            "loaded source snapshot"
        );
        Ok(index)
    }
}

/// Parse snapshot bytes into an index.
pub fn parse_snapshot(source: &str, bytes: &[u8]) -> Result<SourceIndex> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let name_col = column("name").ok_or_else(|| FloracheckError::Source {
        source_id: source.to_string(),
        message: "snapshot has no 'name' column".to_string(),
    })?;
    let native_col = column("native");
    let id_col = column("id");
    let rarity_col = column("rarity");
    let legal_col = column("legal");
    let presence_col = column("presence");

    let mut index = SourceIndex::new(source);
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let name = match record.get(name_col) {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(FloracheckError::Parse {
                    row: i + 2,
                    message: format!("{} snapshot row has no name", source),
                });
            }
        };

        let mut entry = SourceRecord::new(name);
        entry.native = cell(native_col);
        entry.id = cell(id_col);
        entry.rarity = cell(rarity_col);
        entry.legal = split_codes(cell(legal_col));
        entry.presence = split_codes(cell(presence_col));
        index.insert(entry);
    }
    Ok(index)
}

fn split_codes(value: Option<String>) -> BTreeSet<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
