//! Fuzz target for name parsing and candidate generation.
//!
//! Every input must parse or be rejected without panicking, and the
//! candidate sequence must stay finite.

#![no_main]

use libfuzzer_sys::fuzz_target;
use floracheck::names::{candidate_names, to_source_form, NameStyle, Synonym};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    let _ = to_source_form(&input, &NameStyle::CANONICAL);
    let keyless = NameStyle::CANONICAL.with_rank_tokens(false);
    let _ = to_source_form(&input, &keyless);

    // Use each line after the first as a synonym
    let mut lines = input.lines();
    let name = lines.next().unwrap_or_default();
    let synonyms: Vec<Synonym> = lines.map(Synonym::new).collect();
    let candidates = candidate_names(name, &synonyms, "calflora");
    assert!(candidates.len() <= synonyms.len() + 3);
});
