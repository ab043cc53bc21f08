//! Checklist CSV persistence.
//!
//! The checklist is a CSV with one row per taxon:
//!
//! ```text
//! taxon_name,status,synonyms,rarity,legal_status,presence,id:calflora,id:inat
//! Arctostaphylos glauca,N,Arctostaphylos glauca var. glauca,,,SDG,493,53406
//! ```
//!
//! `synonyms` is `;`-separated; a synonym written `source:Name` only applies
//! to that source. `legal_status` and `presence` are `,`-separated.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{FloracheckError, Result};
use crate::names::{to_source_form, NameStyle};
use crate::recon::UpdateSet;

use super::registry::TaxonRegistry;
use super::taxon::{NativeStatus, TaxonData};

/// Column holding the canonical name.
pub const NAME_COLUMN: &str = "taxon_name";

/// Prefix of per-source identifier columns.
pub const ID_PREFIX: &str = "id:";

/// A checklist file loaded row by row, so it can be written back unchanged
/// apart from updated cells.
#[derive(Debug, Clone)]
pub struct TaxaStore {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<IndexMap<String, String>>,
}

impl TaxaStore {
    /// Read a checklist CSV.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FloracheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if !headers.iter().any(|h| h == NAME_COLUMN) {
            return Err(FloracheckError::Parse {
                row: 1,
                message: format!("missing '{}' column", NAME_COLUMN),
            });
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: IndexMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            rows.push(row);
        }

        debug!(path = %path.display(), rows = rows.len(), "loaded checklist");
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// Path the store was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of taxon rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the checklist has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value for a taxon, if the row and column exist.
    ///
    /// The taxon may be given in any spelling that normalizes to the row's
    /// name.
    pub fn cell(&self, taxon: &str, column: &str) -> Option<&str> {
        self.row_index(taxon)
            .and_then(|i| self.rows[i].get(column))
            .map(String::as_str)
    }

    /// Build a registry from the loaded rows.
    pub fn to_registry(&self, subset: bool) -> Result<TaxonRegistry> {
        let mut registry = TaxonRegistry::new().with_subset(subset);
        for (i, row) in self.rows.iter().enumerate() {
            registry.register(parse_row(row, i + 2)?)?;
        }
        info!(taxa = registry.len(), subset, "built taxon registry");
        Ok(registry)
    }

    /// Apply an update set to the in-memory rows.
    ///
    /// Every taxon in the set must exist; nothing is changed otherwise.
    /// Returns the number of cells that changed value.
    pub fn apply(&mut self, updates: &UpdateSet) -> Result<usize> {
        let mut targets = Vec::new();
        for (taxon, fields) in updates.iter() {
            let index = self.row_index(taxon).ok_or_else(|| {
                FloracheckError::Persistence(format!("No checklist row for '{}'", taxon))
            })?;
            targets.push((index, fields));
        }

        let mut changed = 0;
        for (index, fields) in targets {
            for (field, value) in fields {
                let column = field.column(updates.source());
                if !self.headers.contains(&column) {
                    self.headers.push(column.clone());
                }
                let row = &mut self.rows[index];
                if row.get(&column) != Some(value) {
                    row.insert(column, value.clone());
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    /// Apply an update set and rewrite the checklist.
    ///
    /// The file is written to a temporary sibling and renamed over the
    /// original, so a failure leaves the old checklist in place.
    pub fn write(&mut self, updates: &UpdateSet) -> Result<usize> {
        let changed = self.apply(updates)?;
        self.save()?;
        info!(path = %self.path.display(), changed, "wrote checklist updates");
        Ok(changed)
    }

    /// Rewrite the checklist from the in-memory rows.
    pub fn save(&self) -> Result<()> {
        let tmp = temp_sibling(&self.path);
        let result = self.write_csv(&tmp).and_then(|_| {
            fs::rename(&tmp, &self.path).map_err(|e| {
                FloracheckError::Persistence(format!(
                    "Failed to replace '{}': {}",
                    self.path.display(),
                    e
                ))
            })
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            FloracheckError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
        })?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(
                self.headers
                    .iter()
                    .map(|h| row.get(h).map(String::as_str).unwrap_or("")),
            )?;
        }
        writer.flush().map_err(|e| {
            FloracheckError::Persistence(format!("Failed to write '{}': {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Rows are matched on canonical spelling, the same form the registry
    /// keys taxa by.
    fn row_index(&self, taxon: &str) -> Option<usize> {
        let wanted = to_source_form(taxon, &NameStyle::CANONICAL);
        self.rows.iter().position(|row| {
            row.get(NAME_COLUMN)
                .is_some_and(|name| to_source_form(name, &NameStyle::CANONICAL) == wanted)
        })
    }
}

/// Read a families CSV (`genus,family,section`) into a registry.
///
/// Returns the number of genus rows read.
pub fn load_families(path: impl AsRef<Path>, registry: &mut TaxonRegistry) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FloracheckError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut count = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let (genus, family, section) = match (record.get(0), record.get(1), record.get(2)) {
            (Some(g), Some(f), Some(s)) if !g.is_empty() && !f.is_empty() => (g, f, s),
            _ => {
                return Err(FloracheckError::Parse {
                    row: i + 2,
                    message: "expected genus, family and section".to_string(),
                });
            }
        };
        registry.register_family(family, section);
        registry.register_genus(genus, family);
        count += 1;
    }
    Ok(count)
}

fn parse_row(row: &IndexMap<String, String>, line: usize) -> Result<TaxonData> {
    let field = |name: &str| row.get(name).map(String::as_str).unwrap_or("");

    let name = field(NAME_COLUMN);
    if name.is_empty() {
        return Err(FloracheckError::Parse {
            row: line,
            message: "empty taxon name".to_string(),
        });
    }
    let status = NativeStatus::from_code(field("status")).ok_or_else(|| FloracheckError::Parse {
        row: line,
        message: format!("unknown status '{}' for {}", field("status"), name),
    })?;

    let mut data = TaxonData::new(name, status);
    for synonym in split_list(field("synonyms"), ';') {
        data = match synonym.split_once(':') {
            Some((source, syn)) => data.with_source_synonym(syn.trim(), source.trim()),
            None => data.with_synonym(synonym),
        };
    }
    if !field("rarity").is_empty() {
        data = data.with_rarity(field("rarity"));
    }
    for code in split_list(field("legal_status"), ',') {
        data = data.with_legal_status(code);
    }
    for code in split_list(field("presence"), ',') {
        data = data.with_presence(code);
    }
    for (column, value) in row {
        if let Some(source) = column.strip_prefix(ID_PREFIX) {
            if !value.is_empty() {
                data = data.with_id(source, value.as_str());
            }
        }
    }
    Ok(data)
}

fn split_list(value: &str, separator: char) -> impl Iterator<Item = &str> {
    value.split(separator).map(str::trim).filter(|s| !s.is_empty())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_row() {
        let data = parse_row(
            &row(&[
                ("taxon_name", "Hesperoyucca whipplei"),
                ("status", "N"),
                ("synonyms", "Yucca whipplei; jepson:Hesperoyucca whipplei subsp. whipplei"),
                ("rarity", ""),
                ("legal_status", "CE, FT"),
                ("presence", "SDG,RIV"),
                ("id:calflora", "8836"),
                ("id:inat", ""),
            ]),
            2,
        )
        .unwrap();

        assert_eq!(data.synonyms.len(), 2);
        assert_eq!(data.synonyms[0].kind, None);
        assert_eq!(data.synonyms[1].kind.as_deref(), Some("jepson"));
        assert_eq!(data.synonyms[1].name, "Hesperoyucca whipplei subsp. whipplei");
        assert!(data.rarity.is_none());
        assert_eq!(data.legal_status.len(), 2);
        assert!(data.presence.contains("RIV"));
        assert_eq!(data.ids.get("calflora").map(String::as_str), Some("8836"));
        assert!(!data.ids.contains_key("inat"));
    }

    #[test]
    fn test_parse_row_bad_status() {
        let err = parse_row(&row(&[("taxon_name", "Salvia apiana"), ("status", "maybe")]), 7)
            .unwrap_err();
        assert!(matches!(err, FloracheckError::Parse { row: 7, .. }));
    }

    #[test]
    fn test_temp_sibling() {
        assert_eq!(
            temp_sibling(Path::new("data/taxa.csv")),
            PathBuf::from("data/.taxa.csv.tmp")
        );
    }
}
