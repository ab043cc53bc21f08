//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// floracheck: reconcile a curated plant checklist against external authorities
#[derive(Parser)]
#[command(name = "floracheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile the checklist against one source
    Check {
        /// Source id (see `floracheck sources`)
        #[arg(value_name = "SOURCE")]
        source: String,

        #[command(flatten)]
        inputs: Inputs,

        /// Write the discrepancy report to this TSV file
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Write field updates back to the checklist and scan for untracked taxa
        #[arg(long)]
        update: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate exceptions for one source without comparing fields
    Audit {
        /// Source id (see `floracheck sources`)
        #[arg(value_name = "SOURCE")]
        source: String,

        #[command(flatten)]
        inputs: Inputs,
    },

    /// List built-in source profiles
    Sources,

    /// Show the candidate names tried for a taxon
    Candidates {
        /// Canonical scientific name
        #[arg(value_name = "NAME")]
        name: String,

        /// Source id whose spelling rules to apply
        #[arg(short, long)]
        source: Option<String>,

        /// Checklist CSV to read synonyms from
        #[arg(long)]
        taxa: Option<PathBuf>,
    },
}

/// Input files shared by `check` and `audit`.
#[derive(Args)]
pub struct Inputs {
    /// Checklist CSV
    #[arg(long)]
    pub taxa: PathBuf,

    /// Families CSV (genus, family, section)
    #[arg(long)]
    pub families: Option<PathBuf>,

    /// Exceptions JSON
    #[arg(long)]
    pub exceptions: Option<PathBuf>,

    /// Source snapshot TSV
    #[arg(long)]
    pub snapshot: PathBuf,

    /// The checklist is an inclusion-filtered subset
    #[arg(long)]
    pub subset: bool,
}
