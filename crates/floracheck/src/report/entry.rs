//! Discrepancy entries.

use serde::{Deserialize, Serialize};

/// Kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// A local taxon has no record in the source.
    MissingInSource,
    /// A compared field differs and no exception covers it.
    FieldMismatch,
    /// An exception covers a difference that no longer exists.
    UnnecessaryException,
    /// An exception's premise no longer holds.
    StaleException,
    /// An exception rule this source does not handle.
    UnrecognizedExceptionCategory,
    /// A source record was reached by more than one taxon.
    AmbiguousMatch,
    /// A source record that no local taxon reaches.
    UntrackedInSource,
}

impl DiscrepancyKind {
    /// All kinds in report order.
    pub const ALL: [DiscrepancyKind; 7] = [
        DiscrepancyKind::MissingInSource,
        DiscrepancyKind::FieldMismatch,
        DiscrepancyKind::UnnecessaryException,
        DiscrepancyKind::StaleException,
        DiscrepancyKind::UnrecognizedExceptionCategory,
        DiscrepancyKind::AmbiguousMatch,
        DiscrepancyKind::UntrackedInSource,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DiscrepancyKind::MissingInSource => "Missing in source",
            DiscrepancyKind::FieldMismatch => "Field mismatch",
            DiscrepancyKind::UnnecessaryException => "Unnecessary exception",
            DiscrepancyKind::StaleException => "Stale exception",
            DiscrepancyKind::UnrecognizedExceptionCategory => "Unrecognized exception",
            DiscrepancyKind::AmbiguousMatch => "Ambiguous match",
            DiscrepancyKind::UntrackedInSource => "Untracked in source",
        }
    }
}

/// One finding for a curator to look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyEntry {
    /// Local canonical name, or the source's name for untracked records.
    pub taxon: String,
    pub kind: DiscrepancyKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl DiscrepancyEntry {
    /// Create an entry with no details.
    pub fn new(taxon: impl Into<String>, kind: DiscrepancyKind, message: impl Into<String>) -> Self {
        Self {
            taxon: taxon.into(),
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Append a detail value.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Append several detail values.
    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }
}
