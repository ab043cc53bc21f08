//! Reconciliation of the checklist against one authority.

mod engine;
mod fields;
mod matching;
mod summary;
mod update;

pub use engine::{run_reconciliation, ReconOptions, ReconOutcome};
pub use fields::{compare, Comparator, Comparison, Field, FieldValue};
pub use matching::{candidates_for, find_match};
pub use summary::ReconSummary;
pub use update::UpdateSet;
