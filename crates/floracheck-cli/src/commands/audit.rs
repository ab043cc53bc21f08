//! Audit command - re-check exceptions without comparing fields.

use colored::Colorize;
use floracheck::exceptions::{audit_against_source, AuditContext};
use floracheck::DiscrepancyLog;

use super::check::kind_label;
use super::load_inputs;
use crate::cli::Inputs;

pub fn run(source: String, inputs: Inputs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = load_inputs(&source, &inputs)?;

    println!(
        "{} {} exceptions for {}",
        "Auditing".cyan().bold(),
        loaded
            .exceptions
            .entries_for_source(&loaded.profile.id)
            .count()
            .to_string()
            .white()
            .bold(),
        loaded.profile.label.white().bold()
    );

    loaded.exceptions.validate_against(&loaded.registry)?;

    let ctx = AuditContext {
        profile: &loaded.profile,
        index: &loaded.index,
        registry: &loaded.registry,
        exceptions: &loaded.exceptions,
    };
    let mut log = DiscrepancyLog::new();
    audit_against_source(&ctx, &mut log);

    println!();
    if log.is_empty() {
        println!("{}", "All exceptions are still needed.".green());
        return Ok(());
    }

    for entry in log.entries() {
        println!(
            "{} {} {}",
            kind_label(entry.kind),
            entry.taxon.white().bold(),
            entry.message
        );
        if verbose {
            for detail in &entry.details {
                println!("    {}", detail.dimmed());
            }
        }
    }
    println!();
    println!(
        "{} exceptions need attention",
        log.len().to_string().yellow().bold()
    );

    Ok(())
}
