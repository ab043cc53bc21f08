//! Candidates command - show the names tried when matching a taxon.

use std::path::PathBuf;

use colored::Colorize;
use floracheck::{candidate_names, profiles, to_source_form, NameStyle, TaxaStore};

pub fn run(
    name: String,
    source: Option<String>,
    taxa: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (source_id, style) = match source {
        Some(ref id) => {
            let profile = profiles::builtin(id)?;
            (profile.id, profile.name_style)
        }
        None => (String::new(), NameStyle::CANONICAL),
    };

    let synonyms = match taxa {
        Some(path) => {
            let registry = TaxaStore::load(&path)?.to_registry(false)?;
            match registry.lookup(&name) {
                Some(taxon) => taxon.synonyms.clone(),
                None => {
                    println!(
                        "{} '{}' is not in {}",
                        "Note:".yellow().bold(),
                        name,
                        path.display()
                    );
                    Vec::new()
                }
            }
        }
        None => Vec::new(),
    };

    let candidates = candidate_names(&name, &synonyms, &source_id);
    if candidates.is_empty() {
        return Err(format!("Not a scientific name: '{}'", name).into());
    }

    println!("{} {}", "Candidates for".cyan().bold(), name.white().bold());
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "  {}. {:40} {:24} {}",
            i + 1,
            candidate.name,
            candidate.rule.label().dimmed(),
            to_source_form(&candidate.name, &style).white()
        );
    }

    Ok(())
}
