//! Scientific name parsing.
//!
//! Names are split into genus, optional hybrid marker, specific epithet and an
//! optional infraspecific part. Author citations and anything after the
//! infraspecific epithet are dropped.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::style::{HybridStyle, NameStyle};

/// Canonical hybrid marker (U+00D7 MULTIPLICATION SIGN).
pub const HYBRID_MARKER: char = '×';

// Lowercase, optionally hyphenated epithet.
static EPITHET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z\-]*$").unwrap());

/// Infraspecific rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfraRank {
    Subspecies,
    Variety,
    Form,
}

impl InfraRank {
    /// Parse a rank token as written in a name.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "subsp." | "ssp." | "subsp" | "ssp" => Some(InfraRank::Subspecies),
            "var." | "var" => Some(InfraRank::Variety),
            "f." | "forma" => Some(InfraRank::Form),
            _ => None,
        }
    }

    /// The other rank authorities confuse this one with.
    pub fn swapped(&self) -> Option<Self> {
        match self {
            InfraRank::Subspecies => Some(InfraRank::Variety),
            InfraRank::Variety => Some(InfraRank::Subspecies),
            InfraRank::Form => None,
        }
    }
}

/// Infraspecific part of a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Infraspecies {
    /// Rank token; `None` when the name was written without one.
    pub rank: Option<InfraRank>,
    pub epithet: String,
}

/// A scientific name broken into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedName {
    pub genus: String,
    /// True when the species is a named hybrid (`Quercus ×alvordiana`).
    pub hybrid: bool,
    pub species: Option<String>,
    pub infra: Option<Infraspecies>,
}

impl ParsedName {
    /// Parse a name. Returns `None` for blank input.
    pub fn parse(name: &str) -> Option<Self> {
        let mut tokens = name.split_whitespace().peekable();
        let genus = tokens.next()?.to_string();

        let mut hybrid = false;
        if let Some(&token) = tokens.peek() {
            if token == "×" || token == "x" {
                hybrid = true;
                tokens.next();
            }
        }

        let species = match tokens.next() {
            Some(token) => match token.strip_prefix(HYBRID_MARKER) {
                Some(rest) if !rest.is_empty() => {
                    hybrid = true;
                    Some(rest.to_string())
                }
                Some(_) => None,
                None => Some(token.to_string()),
            },
            None => None,
        };

        let infra = match (species.as_ref(), tokens.next()) {
            (Some(_), Some(token)) => match InfraRank::from_token(token) {
                Some(rank) => tokens.next().map(|epithet| Infraspecies {
                    rank: Some(rank),
                    epithet: epithet.to_string(),
                }),
                None if EPITHET.is_match(token) => Some(Infraspecies {
                    rank: None,
                    epithet: token.to_string(),
                }),
                None => None,
            },
            _ => None,
        };

        Some(Self {
            genus,
            hybrid: hybrid && species.is_some(),
            species,
            infra,
        })
    }

    /// Whether the infraspecific epithet repeats the specific epithet.
    pub fn is_nominate(&self) -> bool {
        match (&self.species, &self.infra) {
            (Some(species), Some(infra)) => species == &infra.epithet,
            _ => false,
        }
    }

    /// The species this name belongs to (infraspecific part removed).
    pub fn species_name(&self) -> Option<ParsedName> {
        self.species.as_ref()?;
        Some(Self {
            infra: None,
            ..self.clone()
        })
    }

    /// The same name with subspecies and variety exchanged.
    pub fn rank_swapped(&self) -> Option<ParsedName> {
        let infra = self.infra.as_ref()?;
        let swapped = infra.rank?.swapped()?;
        Some(Self {
            infra: Some(Infraspecies {
                rank: Some(swapped),
                epithet: infra.epithet.clone(),
            }),
            ..self.clone()
        })
    }

    /// Nominate-infraspecies equivalents.
    ///
    /// A nominate infraspecies collapses to its species; a bare species
    /// expands to its nominate subspecies and then its nominate variety.
    pub fn nominate_variants(&self) -> Vec<ParsedName> {
        let Some(species) = self.species.as_ref() else {
            return Vec::new();
        };
        match &self.infra {
            Some(_) if self.is_nominate() => self.species_name().into_iter().collect(),
            Some(_) => Vec::new(),
            None => [InfraRank::Subspecies, InfraRank::Variety]
                .into_iter()
                .map(|rank| Self {
                    infra: Some(Infraspecies {
                        rank: Some(rank),
                        epithet: species.clone(),
                    }),
                    ..self.clone()
                })
                .collect(),
        }
    }

    /// Render the name under a naming style.
    pub fn render(&self, style: &NameStyle) -> String {
        let mut out = self.genus.clone();
        let Some(species) = &self.species else {
            return out;
        };

        out.push(' ');
        if self.hybrid {
            match style.hybrid {
                HybridStyle::Attached => out.push(HYBRID_MARKER),
                HybridStyle::Spaced => {
                    out.push(HYBRID_MARKER);
                    out.push(' ');
                }
                HybridStyle::Ascii => out.push_str("x "),
                HybridStyle::Omitted => {}
            }
        }
        out.push_str(species);

        if let Some(infra) = &self.infra {
            if style.rank_tokens {
                if let Some(rank) = infra.rank {
                    out.push(' ');
                    out.push_str(style.rank_token(rank));
                }
            }
            out.push(' ');
            out.push_str(&infra.epithet);
        }
        out
    }
}

impl fmt::Display for ParsedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&NameStyle::CANONICAL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_species() {
        let name = ParsedName::parse("Arctostaphylos glauca").unwrap();
        assert_eq!(name.genus, "Arctostaphylos");
        assert_eq!(name.species.as_deref(), Some("glauca"));
        assert!(name.infra.is_none());
        assert!(!name.hybrid);
    }

    #[test]
    fn test_parse_infraspecies() {
        let name = ParsedName::parse("Arctostaphylos glauca var. glauca").unwrap();
        let infra = name.infra.as_ref().unwrap();
        assert_eq!(infra.rank, Some(InfraRank::Variety));
        assert_eq!(infra.epithet, "glauca");
        assert!(name.is_nominate());

        let ssp = ParsedName::parse("Calochortus clavatus ssp. pallidus").unwrap();
        assert_eq!(ssp.infra.unwrap().rank, Some(InfraRank::Subspecies));
    }

    #[test]
    fn test_parse_rankless_infraspecies() {
        let name = ParsedName::parse("Arctostaphylos glauca glauca").unwrap();
        let infra = name.infra.as_ref().unwrap();
        assert_eq!(infra.rank, None);
        assert!(name.is_nominate());
    }

    #[test]
    fn test_parse_hybrid_markers() {
        for input in ["Quercus ×alvordiana", "Quercus × alvordiana", "Quercus x alvordiana"] {
            let name = ParsedName::parse(input).unwrap();
            assert!(name.hybrid, "{input}");
            assert_eq!(name.species.as_deref(), Some("alvordiana"), "{input}");
        }
        assert_eq!(
            ParsedName::parse("Quercus x alvordiana").unwrap().to_string(),
            "Quercus ×alvordiana"
        );
    }

    #[test]
    fn test_author_citation_ignored() {
        let name = ParsedName::parse("Salvia apiana Jeps.").unwrap();
        assert!(name.infra.is_none());
        assert_eq!(name.to_string(), "Salvia apiana");
    }

    #[test]
    fn test_blank_and_genus_only() {
        assert!(ParsedName::parse("   ").is_none());
        let genus = ParsedName::parse("Dudleya").unwrap();
        assert_eq!(genus.to_string(), "Dudleya");
        assert!(genus.nominate_variants().is_empty());
    }

    #[test]
    fn test_rank_swap() {
        let name = ParsedName::parse("Ceanothus cuneatus subsp. rigidus").unwrap();
        assert_eq!(
            name.rank_swapped().unwrap().to_string(),
            "Ceanothus cuneatus var. rigidus"
        );
        let form = ParsedName::parse("Pinus contorta f. latifolia").unwrap();
        assert!(form.rank_swapped().is_none());
    }

    #[test]
    fn test_nominate_variants() {
        let nominate = ParsedName::parse("Arctostaphylos glauca var. glauca").unwrap();
        let collapsed: Vec<String> = nominate
            .nominate_variants()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(collapsed, vec!["Arctostaphylos glauca"]);

        let species = ParsedName::parse("Arctostaphylos glauca").unwrap();
        let expanded: Vec<String> = species
            .nominate_variants()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(
            expanded,
            vec![
                "Arctostaphylos glauca subsp. glauca",
                "Arctostaphylos glauca var. glauca"
            ]
        );

        let other = ParsedName::parse("Ceanothus cuneatus var. rigidus").unwrap();
        assert!(other.nominate_variants().is_empty());
    }
}
