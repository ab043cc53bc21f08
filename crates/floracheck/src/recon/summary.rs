//! Run counters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::names::MatchRule;
use crate::report::DiscrepancyKind;

/// Counts describing one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconSummary {
    pub source: String,
    /// Taxa considered.
    pub taxa: usize,
    /// Matched taxa by the rule that matched them.
    pub matched: BTreeMap<MatchRule, usize>,
    /// Unmatched taxa reported missing.
    pub unmatched: usize,
    /// Unmatched taxa outside the source's coverage.
    pub skipped: usize,
    /// Findings an exception accounted for.
    pub suppressed: usize,
    pub entries_by_kind: BTreeMap<DiscrepancyKind, usize>,
    /// Taxa with proposed checklist changes.
    pub updates: usize,
}

impl ReconSummary {
    /// Create an empty summary.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Count a match.
    pub fn record_match(&mut self, rule: MatchRule) {
        *self.matched.entry(rule).or_insert(0) += 1;
    }

    /// Matched taxa over every rule.
    pub fn matched_total(&self) -> usize {
        self.matched.values().sum()
    }

    /// Total discrepancy entries.
    pub fn total_entries(&self) -> usize {
        self.entries_by_kind.values().sum()
    }
}
