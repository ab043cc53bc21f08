//! Check command - reconcile the checklist against one source.

use std::path::PathBuf;

use colored::Colorize;
use floracheck::{run_reconciliation, DiscrepancyKind, ReconOptions};

use super::load_inputs;
use crate::cli::Inputs;

pub fn run(
    source: String,
    inputs: Inputs,
    report: Option<PathBuf>,
    update: bool,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut loaded = load_inputs(&source, &inputs)?;

    if !json {
        println!(
            "{} {} against {} ({} records)",
            "Checking".cyan().bold(),
            inputs.taxa.display().to_string().white(),
            loaded.profile.label.white().bold(),
            loaded.index.len()
        );
    }

    let outcome = run_reconciliation(
        &loaded.profile,
        &loaded.index,
        &loaded.registry,
        &loaded.exceptions,
        ReconOptions { update },
    )?;

    if let Some(ref path) = report {
        outcome.discrepancies.flush(path)?;
    }

    let written = if update && !outcome.updates.is_empty() {
        loaded.store.write(&outcome.updates)?
    } else {
        0
    };

    if json {
        let output = serde_json::json!({
            "source": loaded.profile.id,
            "snapshot": {
                "path": inputs.snapshot,
                "hash": loaded.index.metadata.hash,
                "records": loaded.index.metadata.record_count,
            },
            "summary": outcome.summary,
            "discrepancies": outcome.discrepancies.entries(),
            "cells_written": written,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let summary = &outcome.summary;
    println!();
    println!(
        "Matched {} of {} taxa ({} unmatched, {} outside coverage)",
        summary.matched_total().to_string().white().bold(),
        summary.taxa,
        summary.unmatched.to_string().yellow(),
        summary.skipped
    );
    if verbose {
        for (rule, count) in &summary.matched {
            println!("  {:24} {}", rule.label(), count);
        }
    }
    println!(
        "Exceptions suppressed {} differences",
        summary.suppressed.to_string().white().bold()
    );

    println!();
    if outcome.discrepancies.is_empty() {
        println!("{}", "No discrepancies - checklist agrees with the source!".green());
    } else {
        println!(
            "Found {} discrepancies",
            outcome.discrepancies.len().to_string().white().bold()
        );
        for (kind, count) in outcome.discrepancies.counts_by_kind() {
            println!("  {} {}", kind_label(kind), count);
        }
    }

    if verbose {
        println!();
        for entry in outcome.discrepancies.entries() {
            println!(
                "  {} {} {}",
                kind_label(entry.kind),
                entry.taxon.white().bold(),
                entry.message
            );
            for detail in &entry.details {
                println!("      {}", detail.dimmed());
            }
        }
    }

    if let Some(path) = report {
        println!();
        println!(
            "{} {}",
            "Report written to".green().bold(),
            path.display().to_string().white()
        );
    }

    if update {
        println!(
            "{} {} cells for {} taxa",
            "Updated".green().bold(),
            written.to_string().white().bold(),
            outcome.updates.len()
        );
    } else if outcome.discrepancies.count(DiscrepancyKind::FieldMismatch) > 0 {
        println!(
            "Run with {} to write updatable fields back",
            "--update".cyan().bold()
        );
    }

    Ok(())
}

/// Colour a discrepancy kind by how urgent it is.
pub(crate) fn kind_label(kind: DiscrepancyKind) -> colored::ColoredString {
    let label = format!("{:32}", kind.label());
    match kind {
        DiscrepancyKind::MissingInSource | DiscrepancyKind::FieldMismatch => label.red(),
        DiscrepancyKind::StaleException
        | DiscrepancyKind::UnnecessaryException
        | DiscrepancyKind::UnrecognizedExceptionCategory => label.yellow(),
        DiscrepancyKind::AmbiguousMatch | DiscrepancyKind::UntrackedInSource => label.blue(),
    }
}
