//! Per-authority configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::exceptions::ExceptionCategory;
use crate::names::NameStyle;
use crate::recon::{Comparator, Field};
use crate::registry::{NativeStatus, Taxon};
use crate::source::SourceRecord;

/// One compared field of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: Field,
    pub comparator: Comparator,
    /// Whether a mismatch may be written back to the checklist.
    pub update: bool,
}

impl FieldRule {
    /// Compare `field` with its usual comparator, without updates.
    pub fn new(field: Field) -> Self {
        Self {
            field,
            comparator: field.default_comparator(),
            update: false,
        }
    }

    /// Allow mismatches on this field to be written back.
    pub fn updatable(mut self) -> Self {
        self.update = true;
        self
    }

    /// Use a different comparator.
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }
}

/// Maps an authority's raw native-status codes to local statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTable {
    entries: BTreeMap<String, NativeStatus>,
}

impl StatusTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a raw code. Codes are matched case-insensitively.
    pub fn with(mut self, code: &str, status: NativeStatus) -> Self {
        self.entries.insert(code.trim().to_lowercase(), status);
        self
    }

    /// Classify a raw code.
    pub fn classify(&self, raw: &str) -> Option<NativeStatus> {
        self.entries.get(&raw.trim().to_lowercase()).copied()
    }

    /// Whether a raw code means native.
    pub fn is_native(&self, raw: &str) -> bool {
        self.classify(raw).is_some_and(|s| s.is_native())
    }
}

/// Which unreached source records are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UntrackedFilter {
    All,
    NativeOnly,
    RareOnly,
    None,
}

impl UntrackedFilter {
    /// Whether a record passes the filter.
    pub fn admits(&self, record: &SourceRecord, table: &StatusTable) -> bool {
        match self {
            UntrackedFilter::All => true,
            UntrackedFilter::NativeOnly => record.native.as_deref().is_some_and(|raw| table.is_native(raw)),
            UntrackedFilter::RareOnly => record.rarity.is_some(),
            UntrackedFilter::None => false,
        }
    }
}

/// Which local taxa the authority is expected to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    All,
    Native,
    Introduced,
    Rare,
    /// The authority lists an arbitrary selection; absence means nothing.
    Partial,
}

impl Coverage {
    /// Whether an unmatched taxon should be reported missing.
    pub fn expects(&self, taxon: &Taxon) -> bool {
        match self {
            Coverage::All => true,
            Coverage::Native => taxon.status.is_native(),
            Coverage::Introduced => taxon.status == NativeStatus::Introduced,
            Coverage::Rare => taxon.is_rare(),
            Coverage::Partial => false,
        }
    }
}

/// Everything the engine needs to know about one authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProfile {
    /// Source id used in exceptions, checklist columns and snapshots.
    pub id: String,
    pub label: String,
    pub name_style: NameStyle,
    pub fields: Vec<FieldRule>,
    /// Exception categories this source validates.
    pub categories: Vec<ExceptionCategory>,
    pub status_table: StatusTable,
    pub untracked: UntrackedFilter,
    pub coverage: Coverage,
}

impl SourceProfile {
    /// Create a profile that compares nothing.
    ///
    /// `NotInSource` and `Translation` exceptions are handled by every
    /// profile.
    pub fn new(id: impl Into<String>, label: impl Into<String>, name_style: NameStyle) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            name_style,
            fields: Vec::new(),
            categories: vec![ExceptionCategory::NotInSource, ExceptionCategory::Translation],
            status_table: StatusTable::new(),
            untracked: UntrackedFilter::NativeOnly,
            coverage: Coverage::All,
        }
    }

    /// Compare a field, registering the exception categories that speak
    /// about it.
    pub fn with_field(mut self, rule: FieldRule) -> Self {
        let mut categories = vec![ExceptionCategory::accepting(rule.field)];
        if rule.field == Field::ExternalId {
            categories.push(ExceptionCategory::ExternalId);
        }
        for category in categories {
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
        self.fields.push(rule);
        self
    }

    /// Set the status table.
    pub fn with_status_table(mut self, table: StatusTable) -> Self {
        self.status_table = table;
        self
    }

    /// Set the reverse-scan filter.
    pub fn with_untracked(mut self, filter: UntrackedFilter) -> Self {
        self.untracked = filter;
        self
    }

    /// Set which taxa the source is expected to list.
    pub fn with_coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = coverage;
        self
    }

    /// Rule for a field, if compared.
    pub fn field_rule(&self, field: Field) -> Option<&FieldRule> {
        self.fields.iter().find(|r| r.field == field)
    }

    /// Whether exceptions of this category are validated for this source.
    pub fn handles(&self, category: &ExceptionCategory) -> bool {
        self.categories.contains(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TaxonData;

    #[test]
    fn test_with_field_registers_categories() {
        let profile = SourceProfile::new("test", "Test", NameStyle::CANONICAL)
            .with_field(FieldRule::new(Field::ExternalId).updatable())
            .with_field(FieldRule::new(Field::Presence));

        assert!(profile.handles(&ExceptionCategory::NotInSource));
        assert!(profile.handles(&ExceptionCategory::ExternalId));
        assert!(profile.handles(&ExceptionCategory::IdMismatch));
        assert!(profile.handles(&ExceptionCategory::Presence));
        assert!(!profile.handles(&ExceptionCategory::Rarity));
        assert!(profile.field_rule(Field::ExternalId).unwrap().update);
        assert_eq!(
            profile.field_rule(Field::Presence).unwrap().comparator,
            Comparator::Overlap
        );
    }

    #[test]
    fn test_status_table() {
        let table = StatusTable::new()
            .with("Native", NativeStatus::Native)
            .with("waif", NativeStatus::Introduced);
        assert_eq!(table.classify(" NATIVE "), Some(NativeStatus::Native));
        assert!(!table.is_native("waif"));
        assert_eq!(table.classify("cultivated"), None);
    }

    #[test]
    fn test_untracked_filter() {
        let table = StatusTable::new().with("native", NativeStatus::Native);
        let native = SourceRecord::new("Salvia apiana").with_native("native");
        let rare = SourceRecord::new("Dudleya stolonifera").with_rarity("1B.1");

        assert!(UntrackedFilter::All.admits(&rare, &table));
        assert!(UntrackedFilter::NativeOnly.admits(&native, &table));
        assert!(!UntrackedFilter::NativeOnly.admits(&rare, &table));
        assert!(UntrackedFilter::RareOnly.admits(&rare, &table));
        assert!(!UntrackedFilter::None.admits(&native, &table));
    }

    #[test]
    fn test_coverage() {
        let native = Taxon::from_data(TaxonData::new("Salvia apiana", NativeStatus::Native));
        let weed = Taxon::from_data(TaxonData::new("Brassica nigra", NativeStatus::Introduced));
        let rare = Taxon::from_data(TaxonData::new("Dudleya stolonifera", NativeStatus::Native).with_rarity("1B.1"));

        assert!(Coverage::All.expects(&weed));
        assert!(!Coverage::Native.expects(&weed));
        assert!(Coverage::Introduced.expects(&weed));
        assert!(Coverage::Rare.expects(&rare));
        assert!(!Coverage::Rare.expects(&native));
        assert!(!Coverage::Partial.expects(&native));
    }
}
