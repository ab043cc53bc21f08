//! The in-memory taxon registry.

use std::collections::BTreeMap;

use tracing::{debug, error};

use crate::error::{FloracheckError, Result};
use crate::names::Synonym;

use super::hierarchy::{Family, Genus};
use super::taxon::{Taxon, TaxonData};

/// Every taxon in the local checklist, keyed by canonical name.
///
/// A registry is owned by a single reconciliation run; nothing here is
/// global.
#[derive(Debug, Clone, Default)]
pub struct TaxonRegistry {
    taxa: BTreeMap<String, Taxon>,
    genera: BTreeMap<String, Genus>,
    families: BTreeMap<String, Family>,
    subset: bool,
}

impl TaxonRegistry {
    /// Create an empty, complete registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the registry as built from an inclusion-filtered dataset.
    pub fn with_subset(mut self, subset: bool) -> Self {
        self.subset = subset;
        self
    }

    /// Whether only part of the checklist was loaded.
    pub fn is_subset(&self) -> bool {
        self.subset
    }

    /// Register a taxon.
    pub fn register(&mut self, data: TaxonData) -> Result<&Taxon> {
        let taxon = Taxon::from_data(data);
        if taxon.name.is_empty() {
            return Err(FloracheckError::Parse {
                row: self.taxa.len() + 1,
                message: "empty taxon name".to_string(),
            });
        }
        if self.taxa.contains_key(&taxon.name) {
            return Err(FloracheckError::DuplicateTaxon(taxon.name));
        }

        let genus = self
            .genera
            .entry(taxon.genus.clone())
            .or_insert_with(|| Genus::new(taxon.genus.clone(), None));
        genus.taxa.push(taxon.name.clone());

        debug!(taxon = %taxon.name, "registered taxon");
        let name = taxon.name.clone();
        Ok(self.taxa.entry(name).or_insert(taxon))
    }

    /// Append a synonym to a registered taxon.
    pub fn add_synonym(&mut self, taxon_name: &str, synonym_name: &str, kind: Option<&str>) -> Result<()> {
        let taxon = self
            .taxa
            .get_mut(taxon_name)
            .ok_or_else(|| FloracheckError::UnknownTaxon(taxon_name.to_string()))?;
        let synonym = match kind {
            Some(source) => Synonym::for_source(synonym_name, source),
            None => Synonym::new(synonym_name),
        };
        taxon.synonyms.push(synonym);
        Ok(())
    }

    /// Exact lookup by canonical name.
    pub fn lookup(&self, name: &str) -> Option<&Taxon> {
        self.taxa.get(name)
    }

    /// Whether a canonical name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.taxa.contains_key(name)
    }

    /// All taxa in name order.
    pub fn list(&self) -> impl Iterator<Item = &Taxon> {
        self.taxa.values()
    }

    /// Number of registered taxa.
    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    /// Whether no taxa are registered.
    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    /// Register a family. Re-registering updates the section.
    pub fn register_family(&mut self, name: &str, section: &str) {
        let family = self
            .families
            .entry(name.to_string())
            .and_modify(|f| f.section = section.to_string())
            .or_insert_with(|| Family::new(name, section));

        // Genera assigned before their family was known.
        for genus in self.genera.values() {
            if genus.family.as_deref() == Some(name) && !family.genera.contains(&genus.name) {
                family.genera.push(genus.name.clone());
            }
        }
    }

    /// Assign a genus to a family.
    ///
    /// An unknown family is logged and the assignment is kept, so
    /// [`check_hierarchy`](Self::check_hierarchy) can report the affected
    /// taxa later.
    pub fn register_genus(&mut self, name: &str, family: &str) {
        match self.families.get_mut(family) {
            Some(f) => {
                if !f.genera.iter().any(|g| g == name) {
                    f.genera.push(name.to_string());
                }
            }
            None => error!(genus = name, family, "genus assigned to unknown family"),
        }

        self.genera
            .entry(name.to_string())
            .and_modify(|g| g.family = Some(family.to_string()))
            .or_insert_with(|| Genus::new(name, Some(family.to_string())));
    }

    /// Genus of a registered taxon.
    pub fn genus_of(&self, taxon: &str) -> Option<&Genus> {
        let taxon = self.taxa.get(taxon)?;
        self.genera.get(&taxon.genus)
    }

    /// Family of a registered taxon.
    pub fn family_of(&self, taxon: &str) -> Option<&Family> {
        let family = self.genus_of(taxon)?.family.as_ref()?;
        self.families.get(family)
    }

    /// All families in name order.
    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.values()
    }

    /// Taxa whose genus does not resolve to a known family.
    ///
    /// Each one is logged at error level; none of them is fatal.
    pub fn check_hierarchy(&self) -> Vec<&str> {
        let orphans: Vec<&str> = self
            .taxa
            .values()
            .filter(|t| self.family_of(&t.name).is_none())
            .map(|t| t.name.as_str())
            .collect();
        for name in &orphans {
            error!(taxon = *name, "genus does not resolve to a known family");
        }
        orphans
    }
}
