//! Looking taxa up in a source index.

use tracing::debug;

use crate::exceptions::{ExceptionCategory, ExceptionStore};
use crate::names::{candidate_names, to_source_form, Candidate, CandidateNames, MatchRule, NameStyle};
use crate::profiles::SourceProfile;
use crate::registry::Taxon;
use crate::source::{SourceIndex, SourceRecord};

/// Candidate sequence for a taxon under a profile.
///
/// A translation exception replaces every heuristic with the translated
/// name.
pub fn candidates_for(taxon: &Taxon, profile: &SourceProfile, exceptions: &ExceptionStore) -> CandidateNames {
    match exceptions.text(&taxon.name, &profile.id, &ExceptionCategory::Translation) {
        Some(translated) => CandidateNames::single(translated, MatchRule::Translation),
        None => candidate_names(&taxon.name, &taxon.synonyms, &profile.id),
    }
}

/// First candidate whose source form is listed, with its record.
///
/// An infraspecific candidate the source does not list in its own style is
/// also looked up as a bare trinomial ("Arctostaphylos glauca glauca"), which
/// authorities use for some infraspecies even when they otherwise write rank
/// tokens.
pub fn find_match<'c, 'i>(
    candidates: &'c CandidateNames,
    index: &'i SourceIndex,
    style: &NameStyle,
) -> Option<(&'c Candidate, &'i SourceRecord)> {
    let rankless = style.with_rank_tokens(false);
    let hit = candidates.first_match(|c| {
        let source_form = to_source_form(&c.name, style);
        index.get(&source_form).or_else(|| {
            let bare = to_source_form(&c.name, &rankless);
            (bare != source_form).then(|| index.get(&bare)).flatten()
        })
    });
    if let Some((candidate, record)) = hit {
        debug!(
            candidate = %candidate.name,
            rule = candidate.rule.label(),
            record = %record.name,
            "matched source record"
        );
    }
    hit
}
