//! Curator-maintained exceptions and their audit.
//!
//! Exceptions suppress known, accepted differences between the checklist and
//! an authority. Each run re-checks that every exception is still needed.

pub mod audit;
mod category;
mod persistence;
mod store;

pub use audit::{audit_against_source, premise_check, AuditContext, PremiseCheck};
pub use category::{Exception, ExceptionCategory, ExceptionKey, ExceptionScope, ExceptionValue};
pub use persistence::COMMENT_SECTION;
pub use store::ExceptionStore;
