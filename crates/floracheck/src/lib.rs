//! floracheck: reconcile a curated plant checklist against external botanical
//! authorities.
//!
//! Each authority names and classifies taxa slightly differently. floracheck
//! matches local taxa to an authority's records through a fixed sequence of
//! naming transformations, compares the fields both sides carry, and keeps a
//! curated set of exceptions honest by re-checking every one of them on each
//! run.
//!
//! # Core Principles
//!
//! - **Findings, not failures**: anything a curator should look at goes in the
//!   discrepancy log; only inconsistent local data is an error
//! - **One engine**: every authority is a [`SourceProfile`] value
//! - **Nothing global**: a run owns its registry, exceptions and log
//!
//! # Example
//!
//! ```no_run
//! use floracheck::{profiles, run_reconciliation, ExceptionStore, ReconOptions};
//! use floracheck::{SnapshotAdapter, SourceAdapter, TaxaStore};
//!
//! let registry = TaxaStore::load("data/taxa.csv").unwrap().to_registry(false).unwrap();
//! let exceptions = ExceptionStore::load("data/exceptions.json").unwrap();
//! let index = SnapshotAdapter::new("calflora", "snapshots/calflora.tsv").fetch().unwrap();
//!
//! let outcome = run_reconciliation(
//!     &profiles::calflora(),
//!     &index,
//!     &registry,
//!     &exceptions,
//!     ReconOptions::default(),
//! )
//! .unwrap();
//! outcome.discrepancies.flush("reports/calflora.tsv").unwrap();
//! ```

pub mod error;
pub mod exceptions;
pub mod names;
pub mod profiles;
pub mod recon;
pub mod registry;
pub mod report;
pub mod source;

pub use error::{FloracheckError, Result};
pub use exceptions::{Exception, ExceptionCategory, ExceptionKey, ExceptionStore, ExceptionValue};
pub use names::{candidate_names, to_source_form, MatchRule, NameStyle};
pub use profiles::SourceProfile;
pub use recon::{run_reconciliation, Field, ReconOptions, ReconOutcome, ReconSummary, UpdateSet};
pub use registry::{NativeStatus, TaxaStore, Taxon, TaxonData, TaxonRegistry};
pub use report::{DiscrepancyEntry, DiscrepancyKind, DiscrepancyLog};
pub use source::{SnapshotAdapter, SourceAdapter, SourceIndex, SourceRecord, StaticAdapter};
