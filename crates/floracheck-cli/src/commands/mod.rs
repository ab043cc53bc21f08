//! CLI command implementations.

pub mod audit;
pub mod candidates;
pub mod check;
pub mod sources;

use colored::Colorize;
use floracheck::registry::load_families;
use floracheck::{
    profiles, ExceptionStore, SnapshotAdapter, SourceAdapter, SourceIndex, SourceProfile,
    TaxaStore, TaxonRegistry,
};
use tracing::debug;

use crate::cli::Inputs;

/// Everything one run reads from disk.
pub struct Loaded {
    pub profile: SourceProfile,
    pub store: TaxaStore,
    pub registry: TaxonRegistry,
    pub exceptions: ExceptionStore,
    pub index: SourceIndex,
}

/// Resolve the profile and load every input file.
pub fn load_inputs(source: &str, inputs: &Inputs) -> Result<Loaded, Box<dyn std::error::Error>> {
    let profile = profiles::builtin(source)?;

    if !inputs.taxa.exists() {
        return Err(format!("Checklist not found: {}", inputs.taxa.display()).into());
    }
    let store = TaxaStore::load(&inputs.taxa)?;
    let mut registry = store.to_registry(inputs.subset)?;

    if let Some(ref families) = inputs.families {
        load_families(families, &mut registry)?;
        let orphans = registry.check_hierarchy().len();
        if orphans > 0 {
            println!(
                "{} {} taxa have no family",
                "Warning:".yellow().bold(),
                orphans
            );
        }
    }

    let exceptions = match inputs.exceptions {
        Some(ref path) => ExceptionStore::load(path)?,
        None => ExceptionStore::new(),
    };

    let index = SnapshotAdapter::new(profile.id.clone(), &inputs.snapshot).fetch()?;

    debug!(
        source,
        taxa = registry.len(),
        exceptions = exceptions.len(),
        records = index.len(),
        "inputs loaded"
    );

    Ok(Loaded {
        profile,
        store,
        registry,
        exceptions,
        index,
    })
}
