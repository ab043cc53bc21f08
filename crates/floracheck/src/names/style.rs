//! Authority-specific spelling rules.

use serde::{Deserialize, Serialize};

use super::parse::{InfraRank, ParsedName};

/// How an authority abbreviates the subspecies rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubspeciesToken {
    /// `subsp.`
    Subsp,
    /// `ssp.`
    Ssp,
}

/// How an authority writes the hybrid marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HybridStyle {
    /// `Quercus ×alvordiana`
    Attached,
    /// `Quercus × alvordiana`
    Spaced,
    /// `Quercus x alvordiana`
    Ascii,
    /// `Quercus alvordiana`
    Omitted,
}

/// Lexical rules one authority applies to scientific names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameStyle {
    pub subspecies: SubspeciesToken,
    /// Whether rank tokens appear at all. Some authorities key infraspecies
    /// as three bare words ("Arctostaphylos glauca glauca").
    pub rank_tokens: bool,
    pub hybrid: HybridStyle,
}

impl NameStyle {
    /// The spelling used by the local checklist.
    pub const CANONICAL: NameStyle = NameStyle {
        subspecies: SubspeciesToken::Subsp,
        rank_tokens: true,
        hybrid: HybridStyle::Attached,
    };

    /// Set the subspecies token.
    pub const fn with_subspecies(mut self, token: SubspeciesToken) -> Self {
        self.subspecies = token;
        self
    }

    /// Drop or keep rank tokens.
    pub const fn with_rank_tokens(mut self, keep: bool) -> Self {
        self.rank_tokens = keep;
        self
    }

    /// Set the hybrid marker style.
    pub const fn with_hybrid(mut self, hybrid: HybridStyle) -> Self {
        self.hybrid = hybrid;
        self
    }

    /// Token written for a rank under this style.
    pub fn rank_token(&self, rank: InfraRank) -> &'static str {
        match rank {
            InfraRank::Subspecies => match self.subspecies {
                SubspeciesToken::Subsp => "subsp.",
                SubspeciesToken::Ssp => "ssp.",
            },
            InfraRank::Variety => "var.",
            InfraRank::Form => "f.",
        }
    }
}

impl Default for NameStyle {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Convert a canonical name into the form an authority uses.
///
/// Input that does not parse as a name is returned trimmed.
///
/// ```
/// use floracheck::names::{to_source_form, HybridStyle, NameStyle, SubspeciesToken};
///
/// let style = NameStyle::CANONICAL
///     .with_subspecies(SubspeciesToken::Ssp)
///     .with_hybrid(HybridStyle::Spaced);
/// assert_eq!(to_source_form("Quercus ×alvordiana", &style), "Quercus × alvordiana");
/// assert_eq!(
///     to_source_form("Calochortus clavatus subsp. pallidus", &style),
///     "Calochortus clavatus ssp. pallidus"
/// );
/// ```
pub fn to_source_form(canonical_name: &str, style: &NameStyle) -> String {
    match ParsedName::parse(canonical_name) {
        Some(parsed) => parsed.render(style),
        None => canonical_name.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_is_identity() {
        for name in [
            "Arctostaphylos glauca",
            "Calochortus clavatus subsp. pallidus",
            "Ceanothus cuneatus var. rigidus",
            "Quercus ×alvordiana",
        ] {
            assert_eq!(to_source_form(name, &NameStyle::CANONICAL), name);
        }
    }

    #[test]
    fn test_rank_tokens_dropped() {
        let style = NameStyle::CANONICAL.with_rank_tokens(false);
        assert_eq!(
            to_source_form("Arctostaphylos glauca var. glauca", &style),
            "Arctostaphylos glauca glauca"
        );
    }

    #[test]
    fn test_hybrid_styles() {
        let name = "Quercus ×alvordiana";
        let ascii = NameStyle::CANONICAL.with_hybrid(HybridStyle::Ascii);
        let omitted = NameStyle::CANONICAL.with_hybrid(HybridStyle::Omitted);
        assert_eq!(to_source_form(name, &ascii), "Quercus x alvordiana");
        assert_eq!(to_source_form(name, &omitted), "Quercus alvordiana");
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(
            to_source_form("  Salvia   apiana ", &NameStyle::CANONICAL),
            "Salvia apiana"
        );
        assert_eq!(to_source_form("   ", &NameStyle::CANONICAL), "");
    }
}
