//! The reconciliation engine.
//!
//! One pass compares every registered taxon with one source:
//!
//! 1. Per taxon, walk its candidate sequence until a source record is hit.
//!    Unmatched taxa are reported missing unless an exception or the
//!    source's coverage says otherwise; matched taxa have each profile field
//!    compared.
//! 2. Source records reached by more than one taxon are reported ambiguous.
//! 3. Every exception for the source is audited.
//! 4. In update mode, records no taxon reached are reported untracked.

use std::collections::{BTreeMap, HashMap};
use std::mem::discriminant;

use tracing::{debug, info};

use crate::error::{FloracheckError, Result};
use crate::exceptions::{audit_against_source, AuditContext, ExceptionCategory, ExceptionStore};
use crate::names::{to_source_form, ParsedName};
use crate::profiles::{FieldRule, SourceProfile};
use crate::registry::{Taxon, TaxonRegistry};
use crate::report::{DiscrepancyEntry, DiscrepancyKind, DiscrepancyLog};
use crate::source::{SourceIndex, SourceRecord};

use super::fields::{compare, Comparison, Field, FieldValue};
use super::matching::{candidates_for, find_match};
use super::summary::ReconSummary;
use super::update::UpdateSet;

/// Options for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconOptions {
    /// Collect checklist updates and scan for untracked source records.
    pub update: bool,
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct ReconOutcome {
    pub discrepancies: DiscrepancyLog,
    pub updates: UpdateSet,
    pub summary: ReconSummary,
}

/// Reconcile a registry against one source.
///
/// Fails only on structural problems in the local data or when the index
/// belongs to another source. Everything else ends up in the discrepancy
/// log.
///
/// # Example
///
/// ```
/// use floracheck::profiles;
/// use floracheck::{
///     run_reconciliation, ExceptionStore, NativeStatus, ReconOptions, SourceAdapter,
///     SourceRecord, StaticAdapter, TaxonData, TaxonRegistry,
/// };
///
/// let mut registry = TaxonRegistry::new();
/// registry
///     .register(TaxonData::new("Salvia apiana", NativeStatus::Native).with_id("calflora", "7392"))
///     .unwrap();
///
/// let index = StaticAdapter::new("calflora")
///     .with_record(SourceRecord::new("Salvia apiana").with_native("native").with_id("7392"))
///     .fetch()
///     .unwrap();
///
/// let outcome = run_reconciliation(
///     &profiles::calflora(),
///     &index,
///     &registry,
///     &ExceptionStore::new(),
///     ReconOptions::default(),
/// )
/// .unwrap();
/// assert!(outcome.discrepancies.is_empty());
/// ```
pub fn run_reconciliation(
    profile: &SourceProfile,
    source: &SourceIndex,
    registry: &TaxonRegistry,
    exceptions: &ExceptionStore,
    options: ReconOptions,
) -> Result<ReconOutcome> {
    if source.source != profile.id {
        return Err(FloracheckError::Source {
            source_id: profile.id.clone(),
            message: format!("snapshot was produced for '{}'", source.source),
        });
    }
    exceptions.validate_against(registry)?;

    Reconciler::new(profile, source, registry, exceptions, options).run()
}

/// State for one pass. Nothing here outlives the run.
struct Reconciler<'a> {
    profile: &'a SourceProfile,
    source: &'a SourceIndex,
    registry: &'a TaxonRegistry,
    exceptions: &'a ExceptionStore,
    options: ReconOptions,
    log: DiscrepancyLog,
    updates: UpdateSet,
    summary: ReconSummary,
    /// Source record name to the taxa that reached it, in registry order.
    reached: BTreeMap<&'a str, Vec<&'a str>>,
    unmatched: Vec<&'a Taxon>,
}

impl<'a> Reconciler<'a> {
    fn new(
        profile: &'a SourceProfile,
        source: &'a SourceIndex,
        registry: &'a TaxonRegistry,
        exceptions: &'a ExceptionStore,
        options: ReconOptions,
    ) -> Self {
        Self {
            profile,
            source,
            registry,
            exceptions,
            options,
            log: DiscrepancyLog::new(),
            updates: UpdateSet::new(profile.id.clone()),
            summary: ReconSummary::new(profile.id.clone()),
            reached: BTreeMap::new(),
            unmatched: Vec::new(),
        }
    }

    fn run(mut self) -> Result<ReconOutcome> {
        for taxon in self.registry.list() {
            self.reconcile_taxon(taxon);
        }
        self.report_ambiguous();

        let ctx = AuditContext {
            profile: self.profile,
            index: self.source,
            registry: self.registry,
            exceptions: self.exceptions,
        };
        audit_against_source(&ctx, &mut self.log);

        if self.options.update {
            self.reverse_scan();
        }

        self.summary.entries_by_kind = self.log.counts_by_kind();
        self.summary.updates = self.updates.len();
        info!(
            source = %self.profile.id,
            taxa = self.summary.taxa,
            matched = self.summary.matched_total(),
            unmatched = self.summary.unmatched,
            entries = self.log.len(),
            "reconciliation complete"
        );

        Ok(ReconOutcome {
            discrepancies: self.log,
            updates: self.updates,
            summary: self.summary,
        })
    }

    fn reconcile_taxon(&mut self, taxon: &'a Taxon) {
        self.summary.taxa += 1;
        let candidates = candidates_for(taxon, self.profile, self.exceptions);

        let Some((candidate, record)) = find_match(&candidates, self.source, &self.profile.name_style)
        else {
            self.handle_unmatched(taxon);
            return;
        };

        self.summary.record_match(candidate.rule);
        self.reached.entry(record.name.as_str()).or_default().push(taxon.name.as_str());
        let profile = self.profile;
        for rule in &profile.fields {
            self.compare_field(taxon, record, rule);
        }
    }

    fn handle_unmatched(&mut self, taxon: &'a Taxon) {
        if self.has_exception(taxon, &ExceptionCategory::NotInSource) {
            debug!(taxon = %taxon.name, "absence accepted by exception");
            self.summary.suppressed += 1;
            return;
        }

        self.unmatched.push(taxon);
        if !self.profile.coverage.expects(taxon) {
            debug!(taxon = %taxon.name, "outside source coverage");
            self.summary.skipped += 1;
            return;
        }

        self.summary.unmatched += 1;
        self.log.push(
            DiscrepancyEntry::new(
                &taxon.name,
                DiscrepancyKind::MissingInSource,
                format!("not found in {}", self.profile.label),
            )
            .with_detail(to_source_form(&taxon.name, &self.profile.name_style)),
        );
    }

    fn compare_field(&mut self, taxon: &Taxon, record: &SourceRecord, rule: &FieldRule) {
        let field = rule.field;
        let mut local = field.local_value(taxon, &self.profile.id);
        let remote = field.source_value(record, &self.profile.status_table);
        let mut overridden = false;

        if field == Field::ExternalId {
            if let Some(expected) = self.text_exception(taxon, &ExceptionCategory::ExternalId) {
                if record.id.is_some() && record.id.as_deref() == taxon.id_for(&self.profile.id) {
                    self.unnecessary(taxon, &ExceptionCategory::ExternalId, &local);
                    return;
                }
                local = FieldValue::Text(Some(expected.to_string()));
                overridden = true;
            }
        }
        if field == Field::Presence {
            local = self.ignore_presence_codes(taxon, rule, local, &remote);
        }

        let accepting = ExceptionCategory::accepting(field);
        let accepted = self.has_exception(taxon, &accepting);

        match compare(rule.comparator, &local, &remote) {
            Comparison::Equal if accepted => self.unnecessary(taxon, &accepting, &local),
            Comparison::Equal if overridden => self.summary.suppressed += 1,
            Comparison::Equal | Comparison::NotComparable => {}
            Comparison::Differ { .. } if accepted => {
                debug!(taxon = %taxon.name, field = field.label(), "mismatch accepted by exception");
                self.summary.suppressed += 1;
            }
            Comparison::Differ { local, source } => {
                debug!(taxon = %taxon.name, field = field.label(), %local, %source, "field mismatch");
                self.log.push(
                    DiscrepancyEntry::new(
                        &taxon.name,
                        DiscrepancyKind::FieldMismatch,
                        format!("{} differs from {}", field.label(), self.profile.label),
                    )
                    .with_details([local, source]),
                );
                if rule.update && self.options.update {
                    self.updates.insert(taxon.name.clone(), field, remote.render());
                }
            }
        }
    }

    /// Drop region codes named by `presence:<code>` exceptions.
    ///
    /// A code whose removal does not change the outcome of the comparison
    /// makes its exception unnecessary.
    fn ignore_presence_codes(
        &mut self,
        taxon: &Taxon,
        rule: &FieldRule,
        local: FieldValue,
        remote: &FieldValue,
    ) -> FieldValue {
        let (profile, exceptions) = (self.profile, self.exceptions);
        let category = ExceptionCategory::Presence;
        let ignored: Vec<&str> = exceptions
            .qualifiers(&taxon.name, &profile.id, &category)
            .collect();
        if ignored.is_empty() {
            return local;
        }

        let stripped = local.clone().without_codes(ignored.iter().copied());
        let outcome = discriminant(&compare(rule.comparator, &stripped, remote));
        for code in &ignored {
            let kept = local
                .clone()
                .without_codes(ignored.iter().copied().filter(|c| c != code));
            if discriminant(&compare(rule.comparator, &kept, remote)) == outcome {
                let key = format!("{}:{}", category.token(), code);
                self.unnecessary_rule(taxon, &key, code.to_string());
            }
        }
        stripped
    }

    fn unnecessary(&mut self, taxon: &Taxon, category: &ExceptionCategory, value: &FieldValue) {
        self.unnecessary_rule(taxon, category.token(), value.render());
    }

    fn unnecessary_rule(&mut self, taxon: &Taxon, rule: &str, detail: String) {
        self.log.push(
            DiscrepancyEntry::new(
                &taxon.name,
                DiscrepancyKind::UnnecessaryException,
                format!("unnecessary {} exception '{}'", self.profile.id, rule),
            )
            .with_detail(detail),
        );
    }

    fn has_exception(&self, taxon: &Taxon, category: &ExceptionCategory) -> bool {
        self.exceptions
            .has_exception(&taxon.name, &self.profile.id, category, None)
    }

    fn text_exception(&self, taxon: &Taxon, category: &ExceptionCategory) -> Option<&'a str> {
        self.exceptions.text(&taxon.name, &self.profile.id, category)
    }

    fn report_ambiguous(&mut self) {
        for (record, taxa) in &self.reached {
            let Some((first, others)) = taxa.split_first() else {
                continue;
            };
            if others.is_empty() {
                continue;
            }
            self.log.push(
                DiscrepancyEntry::new(
                    *first,
                    DiscrepancyKind::AmbiguousMatch,
                    format!("{} record matched by {} taxa", self.profile.label, taxa.len()),
                )
                .with_detail(*record)
                .with_details(others.iter().copied()),
            );
        }
    }

    fn reverse_scan(&mut self) {
        let mut by_species: HashMap<(String, String), Vec<&str>> = HashMap::new();
        for taxon in &self.unmatched {
            if let Some(key) = species_key(&taxon.name) {
                by_species.entry(key).or_default().push(taxon.name.as_str());
            }
        }

        let mut untracked = 0;
        for record in self.source.records() {
            if self.reached.contains_key(record.name.as_str())
                || !self.profile.untracked.admits(record, &self.profile.status_table)
            {
                continue;
            }
            untracked += 1;

            let possible = species_key(&record.name)
                .and_then(|key| by_species.get(&key))
                .map(Vec::as_slice)
                .unwrap_or_default();
            self.log.push(
                DiscrepancyEntry::new(
                    &record.name,
                    DiscrepancyKind::UntrackedInSource,
                    format!("listed by {} but not in checklist", self.profile.label),
                )
                .with_details(possible.iter().map(|name| format!("possible match: {}", name))),
            );
        }
        debug!(source = %self.profile.id, untracked, "reverse scan complete");
    }
}

fn species_key(name: &str) -> Option<(String, String)> {
    let parsed = ParsedName::parse(name)?;
    Some((parsed.genus, parsed.species?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles;
    use crate::registry::{NativeStatus, TaxonData};

    #[test]
    fn test_source_id_must_match_profile() {
        let registry = TaxonRegistry::new();
        let index = SourceIndex::new("inat");
        let err = run_reconciliation(
            &profiles::calflora(),
            &index,
            &registry,
            &ExceptionStore::new(),
            ReconOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FloracheckError::Source { ref source_id, .. } if source_id == "calflora"));
    }

    #[test]
    fn test_species_key() {
        assert_eq!(
            species_key("Calochortus clavatus ssp. pallidus"),
            Some(("Calochortus".to_string(), "clavatus".to_string()))
        );
        assert_eq!(species_key("Dudleya"), None);
    }

    #[test]
    fn test_partial_coverage_compares_but_never_misses() {
        let mut registry = TaxonRegistry::new();
        registry.register(TaxonData::new("Brassica nigra", NativeStatus::Native)).unwrap();
        registry.register(TaxonData::new("Salvia apiana", NativeStatus::Native)).unwrap();

        let mut index = SourceIndex::new("calipc");
        index.insert(SourceRecord::new("Brassica nigra").with_native("moderate"));

        let outcome = run_reconciliation(
            &profiles::calipc(),
            &index,
            &registry,
            &ExceptionStore::new(),
            ReconOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.discrepancies.len(), 1);
        assert_eq!(outcome.discrepancies.entries()[0].kind, DiscrepancyKind::FieldMismatch);
        assert_eq!(outcome.summary.skipped, 1);
        assert_eq!(outcome.summary.unmatched, 0);
    }
}
