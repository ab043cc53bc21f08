//! Discrepancy reporting.

mod entry;
mod log;

pub use entry::{DiscrepancyEntry, DiscrepancyKind};
pub use log::DiscrepancyLog;
