//! Ordered match candidates for a canonical name.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::parse::ParsedName;

/// A synonym registered for a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub name: String,
    /// Source id whose spelling this is. Untagged synonyms apply everywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Synonym {
    /// Create an untagged synonym.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    /// Create a synonym that only applies to one source.
    pub fn for_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Some(source.into()),
        }
    }

    /// Whether this synonym should be tried against `source`.
    pub fn applies_to(&self, source: &str) -> bool {
        self.kind.as_deref().is_none_or(|kind| kind == source)
    }
}

/// Which rule produced a candidate, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Curator-supplied translated name; replaces every other rule.
    Translation,
    /// The canonical name itself.
    Exact,
    /// A registered synonym.
    Synonym,
    /// Subspecies and variety exchanged.
    RankSwap,
    /// Nominate infraspecies collapsed to, or expanded from, the species.
    NominateInfraspecies,
}

impl MatchRule {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MatchRule::Translation => "translation",
            MatchRule::Exact => "exact",
            MatchRule::Synonym => "synonym",
            MatchRule::RankSwap => "rank swap",
            MatchRule::NominateInfraspecies => "nominate infraspecies",
        }
    }
}

/// One name to try against a source index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub rule: MatchRule,
}

/// Finite, ordered candidate sequence.
///
/// The sequence is a plain value: iterating it never consumes shared state,
/// so it can be walked as many times as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateNames {
    candidates: Vec<Candidate>,
}

impl CandidateNames {
    /// A sequence holding a single name.
    pub fn single(name: impl Into<String>, rule: MatchRule) -> Self {
        Self {
            candidates: vec![Candidate {
                name: name.into(),
                rule,
            }],
        }
    }

    /// Iterate candidates in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Number of distinct candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether there is nothing to try.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Return the first candidate for which `probe` yields a value.
    pub fn first_match<T>(
        &self,
        mut probe: impl FnMut(&Candidate) -> Option<T>,
    ) -> Option<(&Candidate, T)> {
        self.candidates
            .iter()
            .find_map(|candidate| probe(candidate).map(|found| (candidate, found)))
    }

    fn push(&mut self, seen: &mut HashSet<String>, name: String, rule: MatchRule) {
        if name.is_empty() || !seen.insert(name.clone()) {
            return;
        }
        self.candidates.push(Candidate { name, rule });
    }
}

impl IntoIterator for CandidateNames {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateNames {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// Build the candidate sequence for a canonical name.
///
/// Priority: the exact name, then each synonym that applies to `source` in
/// insertion order, then the rank-swapped name, then nominate-infraspecies
/// equivalents. A string produced by more than one rule is kept at its first
/// position.
///
/// ```
/// use floracheck::names::{candidate_names, MatchRule};
///
/// let names = candidate_names("Ceanothus cuneatus subsp. rigidus", &[], "calflora");
/// let rules: Vec<MatchRule> = names.iter().map(|c| c.rule).collect();
/// assert_eq!(rules, vec![MatchRule::Exact, MatchRule::RankSwap]);
/// ```
pub fn candidate_names(canonical_name: &str, synonyms: &[Synonym], source: &str) -> CandidateNames {
    let mut names = CandidateNames::default();
    let mut seen = HashSet::new();
    let parsed = ParsedName::parse(canonical_name);

    let exact = parsed
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_else(|| canonical_name.trim().to_string());
    names.push(&mut seen, exact, MatchRule::Exact);

    for synonym in synonyms.iter().filter(|s| s.applies_to(source)) {
        let name = match ParsedName::parse(&synonym.name) {
            Some(p) => p.to_string(),
            None => continue,
        };
        names.push(&mut seen, name, MatchRule::Synonym);
    }

    if let Some(parsed) = parsed {
        if let Some(swapped) = parsed.rank_swapped() {
            names.push(&mut seen, swapped.to_string(), MatchRule::RankSwap);
        }
        for variant in parsed.nominate_variants() {
            names.push(&mut seen, variant.to_string(), MatchRule::NominateInfraspecies);
        }
    }

    names
}
