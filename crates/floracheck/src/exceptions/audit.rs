//! Re-checking exception premises against a source snapshot.
//!
//! Every category has one premise check. A check returns the reason the
//! exception is stale, or `None` while its premise still holds. Which
//! categories are checked for a source comes from its profile.

use tracing::{debug, info};

use crate::names::{candidate_names, to_source_form, CandidateNames, MatchRule};
use crate::profiles::{SourceProfile, BUILTIN_IDS};
use crate::recon::{candidates_for, find_match};
use crate::registry::TaxonRegistry;
use crate::report::{DiscrepancyEntry, DiscrepancyKind, DiscrepancyLog};
use crate::source::{SourceIndex, SourceRecord};

use super::category::{Exception, ExceptionCategory};
use super::store::ExceptionStore;

/// Everything a premise check can look at.
pub struct AuditContext<'a> {
    pub profile: &'a SourceProfile,
    pub index: &'a SourceIndex,
    pub registry: &'a TaxonRegistry,
    pub exceptions: &'a ExceptionStore,
}

impl AuditContext<'_> {
    /// Source record the exception's taxon currently reaches.
    ///
    /// Registered taxa use their candidate sequence (`translate` applies a
    /// translation exception); unregistered global taxa use the bare name.
    fn reached(&self, taxon: &str, translate: bool) -> Option<&SourceRecord> {
        let candidates = match self.registry.lookup(taxon) {
            Some(t) if translate => candidates_for(t, self.profile, self.exceptions),
            Some(t) => candidate_names(&t.name, &t.synonyms, &self.profile.id),
            None => CandidateNames::single(taxon, MatchRule::Exact),
        };
        find_match(&candidates, self.index, &self.profile.name_style).map(|(_, record)| record)
    }
}

/// Premise check for one category.
pub type PremiseCheck = fn(&AuditContext<'_>, &Exception) -> Option<String>;

/// Premise check for a category, if it has one.
pub fn premise_check(category: &ExceptionCategory) -> Option<PremiseCheck> {
    match category {
        ExceptionCategory::NotInSource => Some(check_not_in_source),
        ExceptionCategory::Translation => Some(check_translation),
        ExceptionCategory::NativeStatus
        | ExceptionCategory::ExternalId
        | ExceptionCategory::IdMismatch
        | ExceptionCategory::Rarity
        | ExceptionCategory::LegalStatus
        | ExceptionCategory::Presence => Some(check_field),
        ExceptionCategory::Unrecognized(_) => None,
    }
}

/// "The taxon is absent from the source."
pub fn check_not_in_source(ctx: &AuditContext<'_>, exception: &Exception) -> Option<String> {
    ctx.reached(&exception.key.taxon, false)
        .map(|record| format!("{} lists '{}'", ctx.profile.label, record.name))
}

/// "The source spells the taxon with the translated name."
pub fn check_translation(ctx: &AuditContext<'_>, exception: &Exception) -> Option<String> {
    let Some(translated) = exception.value.as_text() else {
        return Some("translation value is not a name".to_string());
    };
    let source_form = to_source_form(translated, &ctx.profile.name_style);
    if !ctx.index.contains(&source_form) {
        return Some(format!("'{}' is not in {}", source_form, ctx.profile.label));
    }

    let canonical = to_source_form(&exception.key.taxon, &ctx.profile.name_style);
    if canonical != source_form && ctx.index.contains(&canonical) {
        return Some(format!("{} now lists '{}'", ctx.profile.label, canonical));
    }
    None
}

/// "The taxon is present in the source and the field differs."
///
/// Only the match itself is checked here. A field that no longer differs is
/// reported by the engine while comparing.
pub fn check_field(ctx: &AuditContext<'_>, exception: &Exception) -> Option<String> {
    match ctx.reached(&exception.key.taxon, true) {
        Some(_) => None,
        None => Some(format!(
            "taxon no longer matches any {} record",
            ctx.profile.label
        )),
    }
}

/// Audit every exception stored for the profile's source.
///
/// Disabled exceptions (value `false`) are skipped, as are local exceptions
/// for taxa missing from a subset registry.
pub fn audit_against_source(ctx: &AuditContext<'_>, log: &mut DiscrepancyLog) {
    let mut audited = 0;
    for exception in ctx.exceptions.entries_for_source(&ctx.profile.id) {
        if !exception.value.is_set() || !ExceptionStore::applies_to(exception, ctx.registry) {
            continue;
        }
        audited += 1;

        let key = &exception.key;
        let check = match premise_check(&key.category) {
            Some(check)
                if ctx.profile.handles(&key.category)
                    && (key.subcategory.is_none() || key.category.takes_subcategory()) =>
            {
                check
            }
            _ => {
                log.push(
                    DiscrepancyEntry::new(
                        &key.taxon,
                        DiscrepancyKind::UnrecognizedExceptionCategory,
                        format!("unrecognized {} exception '{}'", ctx.profile.id, key.rule()),
                    )
                    .with_detail(exception.value.to_string()),
                );
                continue;
            }
        };

        if let Some(reason) = check(ctx, exception) {
            debug!(taxon = %key.taxon, rule = %key.rule(), %reason, "stale exception");
            log.push(
                DiscrepancyEntry::new(
                    &key.taxon,
                    DiscrepancyKind::StaleException,
                    format!("stale {} exception '{}'", ctx.profile.id, key.rule()),
                )
                .with_detail(reason),
            );
        }
    }
    audited += report_unknown_sections(ctx, log);
    info!(source = %ctx.profile.id, audited, "audited exceptions");
}

/// Report exceptions filed under a section no profile reads.
///
/// Such a section is usually a misspelt source id.
fn report_unknown_sections(ctx: &AuditContext<'_>, log: &mut DiscrepancyLog) -> usize {
    let mut reported = 0;
    for exception in ctx.exceptions.entries() {
        let key = &exception.key;
        if key.source == ctx.profile.id
            || BUILTIN_IDS.contains(&key.source.as_str())
            || !exception.value.is_set()
            || !ExceptionStore::applies_to(exception, ctx.registry)
        {
            continue;
        }
        reported += 1;
        log.push(
            DiscrepancyEntry::new(
                &key.taxon,
                DiscrepancyKind::UnrecognizedExceptionCategory,
                format!("exception '{}' for unknown source '{}'", key.rule(), key.source),
            )
            .with_detail(exception.value.to_string()),
        );
    }
    reported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::{ExceptionKey, ExceptionValue};
    use crate::profiles;
    use crate::registry::{NativeStatus, TaxonData};

    fn fixture() -> (TaxonRegistry, SourceIndex) {
        let mut registry = TaxonRegistry::new();
        registry.register(TaxonData::new("Salvia apiana", NativeStatus::Native)).unwrap();
        registry.register(TaxonData::new("Hesperoyucca whipplei", NativeStatus::Native)).unwrap();
        let mut index = SourceIndex::new("calflora");
        index.insert(SourceRecord::new("Salvia apiana"));
        index.insert(SourceRecord::new("Yucca whipplei"));
        (registry, index)
    }

    fn run(store: &ExceptionStore) -> DiscrepancyLog {
        let (registry, index) = fixture();
        let profile = profiles::calflora();
        let ctx = AuditContext {
            profile: &profile,
            index: &index,
            registry: &registry,
            exceptions: store,
        };
        let mut log = DiscrepancyLog::new();
        audit_against_source(&ctx, &mut log);
        log
    }

    fn store(entries: Vec<Exception>) -> ExceptionStore {
        let mut store = ExceptionStore::new();
        for e in entries {
            store.insert(e).unwrap();
        }
        store
    }

    fn exception(taxon: &str, category: ExceptionCategory, value: ExceptionValue) -> Exception {
        Exception::new(ExceptionKey::new(taxon, "calflora", category), value)
    }

    #[test]
    fn test_not_in_source_stale() {
        let log = run(&store(vec![exception(
            "Salvia apiana",
            ExceptionCategory::NotInSource,
            ExceptionValue::Flag(true),
        )]));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].kind, DiscrepancyKind::StaleException);
        assert_eq!(log.entries()[0].details, vec!["Calflora lists 'Salvia apiana'"]);
    }

    #[test]
    fn test_translation_premise_holds() {
        let log = run(&store(vec![exception(
            "Hesperoyucca whipplei",
            ExceptionCategory::Translation,
            ExceptionValue::Text("Yucca whipplei".into()),
        )]));
        assert!(log.is_empty());
    }

    #[test]
    fn test_translation_target_gone() {
        let log = run(&store(vec![exception(
            "Salvia apiana",
            ExceptionCategory::Translation,
            ExceptionValue::Text("Audibertia polystachya".into()),
        )]));
        assert_eq!(log.count(DiscrepancyKind::StaleException), 1);
    }

    #[test]
    fn test_field_exception_for_unmatched_taxon() {
        let log = run(&store(vec![
            exception("Hesperoyucca whipplei", ExceptionCategory::IdMismatch, ExceptionValue::Flag(true)),
            exception("Salvia apiana", ExceptionCategory::IdMismatch, ExceptionValue::Flag(true)),
        ]));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].taxon, "Hesperoyucca whipplei");
    }

    #[test]
    fn test_unrecognized_and_unhandled() {
        let log = run(&store(vec![
            exception(
                "Salvia apiana",
                ExceptionCategory::Unrecognized("cesa".into()),
                ExceptionValue::Flag(true),
            ),
            exception("Salvia apiana", ExceptionCategory::Rarity, ExceptionValue::Flag(true)),
            Exception::new(
                ExceptionKey::new("Salvia apiana", "calflora", ExceptionCategory::NativeStatus)
                    .with_subcategory("SDG"),
                ExceptionValue::Flag(true),
            ),
        ]));
        assert_eq!(log.count(DiscrepancyKind::UnrecognizedExceptionCategory), 3);
    }

    #[test]
    fn test_disabled_exception_skipped() {
        let log = run(&store(vec![exception(
            "Salvia apiana",
            ExceptionCategory::NotInSource,
            ExceptionValue::Flag(false),
        )]));
        assert!(log.is_empty());
    }

    #[test]
    fn test_global_exception_for_absent_taxon() {
        let (registry, index) = fixture();
        let subset = registry.with_subset(true);
        let profile = profiles::calflora();
        let store = store(vec![
            exception("Salvia mellifera", ExceptionCategory::NotInSource, ExceptionValue::Flag(true)),
            exception("Yucca whipplei", ExceptionCategory::NotInSource, ExceptionValue::Flag(true))
                .global(),
        ]);
        let ctx = AuditContext {
            profile: &profile,
            index: &index,
            registry: &subset,
            exceptions: &store,
        };
        let mut log = DiscrepancyLog::new();
        audit_against_source(&ctx, &mut log);

        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].taxon, "Yucca whipplei");
    }

    #[test]
    fn test_unknown_section_reported() {
        let store = store(vec![Exception::new(
            ExceptionKey::new("Salvia apiana", "calfora", ExceptionCategory::NotInSource),
            ExceptionValue::Flag(true),
        )]);
        let log = run(&store);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].kind, DiscrepancyKind::UnrecognizedExceptionCategory);
        assert_eq!(
            log.entries()[0].message,
            "exception 'notinsource' for unknown source 'calfora'"
        );
    }
}
