//! Name normalization.
//!
//! Pure functions that turn a canonical scientific name into the spellings
//! external authorities use, and into the ordered sequence of names the
//! reconciliation engine tries when looking a taxon up in a source.
//!
//! # Example
//!
//! ```
//! use floracheck::names::{candidate_names, to_source_form, MatchRule, NameStyle, Synonym};
//!
//! let synonyms = vec![Synonym::new("Arctostaphylos glauca var. glauca")];
//! let candidates = candidate_names("Arctostaphylos glauca", &synonyms, "calflora");
//!
//! let keyless = NameStyle::CANONICAL.with_rank_tokens(false);
//! let hit = candidates.first_match(|c| {
//!     (to_source_form(&c.name, &keyless) == "Arctostaphylos glauca glauca").then_some(())
//! });
//! assert_eq!(hit.unwrap().0.rule, MatchRule::Synonym);
//! ```

mod candidates;
mod parse;
mod style;

pub use candidates::{candidate_names, Candidate, CandidateNames, MatchRule, Synonym};
pub use parse::{InfraRank, Infraspecies, ParsedName, HYBRID_MARKER};
pub use style::{to_source_form, HybridStyle, NameStyle, SubspeciesToken};
