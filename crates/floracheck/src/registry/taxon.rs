//! Taxon records held by the registry.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::names::{ParsedName, Synonym};

/// Local nativity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NativeStatus {
    Native,
    Introduced,
    Uncertain,
    NativeQuestionable,
}

impl NativeStatus {
    /// Parse a checklist status code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "n" | "native" => Some(NativeStatus::Native),
            "x" | "i" | "introduced" => Some(NativeStatus::Introduced),
            "u" | "?" | "uncertain" => Some(NativeStatus::Uncertain),
            "n?" | "native?" | "native-questionable" => Some(NativeStatus::NativeQuestionable),
            _ => None,
        }
    }

    /// Code written to the checklist.
    pub fn code(&self) -> &'static str {
        match self {
            NativeStatus::Native => "N",
            NativeStatus::Introduced => "X",
            NativeStatus::Uncertain => "U",
            NativeStatus::NativeQuestionable => "N?",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            NativeStatus::Native => "native",
            NativeStatus::Introduced => "introduced",
            NativeStatus::Uncertain => "uncertain",
            NativeStatus::NativeQuestionable => "native?",
        }
    }

    /// Native or probably native.
    pub fn is_native(&self) -> bool {
        matches!(self, NativeStatus::Native | NativeStatus::NativeQuestionable)
    }
}

/// Input for registering a taxon.
#[derive(Debug, Clone)]
pub struct TaxonData {
    pub name: String,
    pub status: NativeStatus,
    pub synonyms: Vec<Synonym>,
    pub ids: BTreeMap<String, String>,
    pub rarity: Option<String>,
    pub legal_status: BTreeSet<String>,
    pub presence: BTreeSet<String>,
}

impl TaxonData {
    /// Create taxon data with only a name and status.
    pub fn new(name: impl Into<String>, status: NativeStatus) -> Self {
        Self {
            name: name.into(),
            status,
            synonyms: Vec::new(),
            ids: BTreeMap::new(),
            rarity: None,
            legal_status: BTreeSet::new(),
            presence: BTreeSet::new(),
        }
    }

    /// Add a synonym that applies to every source.
    pub fn with_synonym(mut self, name: impl Into<String>) -> Self {
        self.synonyms.push(Synonym::new(name));
        self
    }

    /// Add a synonym spelled this way by one source only.
    pub fn with_source_synonym(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.synonyms.push(Synonym::for_source(name, source));
        self
    }

    /// Set the identifier a source uses for this taxon.
    pub fn with_id(mut self, source: impl Into<String>, id: impl Into<String>) -> Self {
        self.ids.insert(source.into(), id.into());
        self
    }

    /// Set the rarity code.
    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }

    /// Add a legal-status code.
    pub fn with_legal_status(mut self, code: impl Into<String>) -> Self {
        self.legal_status.insert(code.into());
        self
    }

    /// Add a presence code.
    pub fn with_presence(mut self, code: impl Into<String>) -> Self {
        self.presence.insert(code.into());
        self
    }
}

/// A registered taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxon {
    /// Canonical name; unique in the registry.
    pub name: String,
    /// Genus name, resolved through the registry.
    pub genus: String,
    pub status: NativeStatus,
    pub synonyms: Vec<Synonym>,
    /// Source id to external identifier.
    pub ids: BTreeMap<String, String>,
    pub rarity: Option<String>,
    pub legal_status: BTreeSet<String>,
    pub presence: BTreeSet<String>,
}

impl Taxon {
    pub(crate) fn from_data(data: TaxonData) -> Self {
        let name = ParsedName::parse(&data.name)
            .map(|p| p.to_string())
            .unwrap_or_else(|| data.name.trim().to_string());
        let genus = name.split_whitespace().next().unwrap_or_default().to_string();
        Self {
            name,
            genus,
            status: data.status,
            synonyms: data.synonyms,
            ids: data.ids,
            rarity: data.rarity,
            legal_status: data.legal_status,
            presence: data.presence,
        }
    }

    /// Identifier for a source, if recorded.
    pub fn id_for(&self, source: &str) -> Option<&str> {
        self.ids.get(source).map(String::as_str)
    }

    /// Whether the taxon carries a rarity code.
    pub fn is_rare(&self) -> bool {
        self.rarity.is_some()
    }
}
