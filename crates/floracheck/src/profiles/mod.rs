//! Source profiles.
//!
//! A [`SourceProfile`] is a plain value describing one authority: how it
//! spells names, which fields are compared and how, which exception
//! categories it validates, and which records the reverse scan reports.
//! The engine is generic over profiles; there is no per-source code path.

mod builtin;
mod profile;

pub use builtin::{all, builtin, calflora, calipc, fna, inat, jepson, rpi, BUILTIN_IDS};
pub use profile::{Coverage, FieldRule, SourceProfile, StatusTable, UntrackedFilter};
