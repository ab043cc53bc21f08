//! Keyed exception storage.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{FloracheckError, Result};
use crate::registry::TaxonRegistry;

use super::category::{Exception, ExceptionCategory, ExceptionKey, ExceptionValue};

/// All exceptions for a run, ordered by key.
#[derive(Debug, Clone, Default)]
pub struct ExceptionStore {
    entries: BTreeMap<ExceptionKey, Exception>,
}

impl ExceptionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exception. Fails if the key is already present.
    pub fn insert(&mut self, exception: Exception) -> Result<()> {
        if self.entries.contains_key(&exception.key) {
            return Err(FloracheckError::DuplicateException {
                taxon: exception.key.taxon.clone(),
                section: exception.key.source.clone(),
                rule: exception.key.rule(),
            });
        }
        self.entries.insert(exception.key.clone(), exception);
        Ok(())
    }

    /// Number of stored exceptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an exception by its parts.
    pub fn get(
        &self,
        taxon: &str,
        source: &str,
        category: &ExceptionCategory,
        subcategory: Option<&str>,
    ) -> Option<&Exception> {
        let key = ExceptionKey {
            taxon: taxon.to_string(),
            source: source.to_string(),
            category: category.clone(),
            subcategory: subcategory.map(str::to_string),
        };
        self.entries.get(&key)
    }

    /// Whether an exception with a set value exists.
    pub fn has_exception(
        &self,
        taxon: &str,
        source: &str,
        category: &ExceptionCategory,
        subcategory: Option<&str>,
    ) -> bool {
        self.get_value(taxon, source, category, subcategory)
            .is_some_and(ExceptionValue::is_set)
    }

    /// Value of an exception, if present.
    pub fn get_value(
        &self,
        taxon: &str,
        source: &str,
        category: &ExceptionCategory,
        subcategory: Option<&str>,
    ) -> Option<&ExceptionValue> {
        self.get(taxon, source, category, subcategory).map(|e| &e.value)
    }

    /// Boolean value of an exception, or `default` when absent or not a flag.
    pub fn flag(
        &self,
        taxon: &str,
        source: &str,
        category: &ExceptionCategory,
        subcategory: Option<&str>,
        default: bool,
    ) -> bool {
        match self.get_value(taxon, source, category, subcategory) {
            Some(ExceptionValue::Flag(flag)) => *flag,
            _ => default,
        }
    }

    /// Text value of an exception with a set value.
    pub fn text(
        &self,
        taxon: &str,
        source: &str,
        category: &ExceptionCategory,
    ) -> Option<&str> {
        self.get_value(taxon, source, category, None)
            .and_then(ExceptionValue::as_text)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Every exception in key order.
    pub fn entries(&self) -> impl Iterator<Item = &Exception> {
        self.entries.values()
    }

    /// Exceptions for one source, in key order.
    pub fn entries_for_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Exception> + 'a {
        self.entries.values().filter(move |e| e.key.source == source)
    }

    /// Subcategory-qualified exceptions for a taxon, source and category.
    pub fn qualifiers<'a>(
        &'a self,
        taxon: &'a str,
        source: &'a str,
        category: &'a ExceptionCategory,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.entries_for_source(source)
            .filter(move |e| {
                e.key.taxon == taxon && &e.key.category == category && e.value.is_set()
            })
            .filter_map(|e| e.key.subcategory.as_deref())
    }

    /// Whether an exception should be considered against this registry.
    ///
    /// Exceptions for taxa missing from a subset registry only apply when
    /// scoped global.
    pub fn applies_to(exception: &Exception, registry: &TaxonRegistry) -> bool {
        registry.contains(&exception.key.taxon) || exception.is_global()
    }

    /// Check that every exception names a registered taxon.
    ///
    /// A subset registry cannot tell a typo from a filtered-out taxon, so
    /// unknown names there are only logged.
    pub fn validate_against(&self, registry: &TaxonRegistry) -> Result<()> {
        for exception in self.entries.values() {
            if registry.contains(&exception.key.taxon) {
                continue;
            }
            if !registry.is_subset() {
                return Err(FloracheckError::UnknownTaxon(exception.key.taxon.clone()));
            }
            if !exception.is_global() {
                warn!(
                    taxon = %exception.key.taxon,
                    source = %exception.key.source,
                    rule = %exception.key.rule(),
                    "skipping exception for taxon outside subset"
                );
            }
        }
        Ok(())
    }
}
