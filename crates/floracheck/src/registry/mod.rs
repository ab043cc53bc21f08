//! Local checklist: taxa, synonyms and the genus/family hierarchy.

mod hierarchy;
#[allow(clippy::module_inception)]
mod registry;
pub mod store;
mod taxon;

pub use hierarchy::{Family, Genus};
pub use registry::TaxonRegistry;
pub use store::{load_families, TaxaStore};
pub use taxon::{NativeStatus, Taxon, TaxonData};
