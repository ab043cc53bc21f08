//! Exception keys, categories and values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::recon::Field;

/// What an exception overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionCategory {
    /// The taxon is known to be absent from the source.
    NotInSource,
    /// The native-status mismatch is accepted.
    NativeStatus,
    /// The source uses a different identifier than the checklist records.
    ExternalId,
    /// The identifier mismatch is accepted.
    IdMismatch,
    /// The source spells the taxon with a different name.
    Translation,
    /// The rarity mismatch is accepted.
    Rarity,
    /// The legal-status mismatch is accepted.
    LegalStatus,
    /// The presence mismatch is accepted.
    Presence,
    /// A rule token this version does not understand.
    Unrecognized(String),
}

impl ExceptionCategory {
    /// Parse a rule token. Unknown tokens are kept as `Unrecognized`.
    pub fn parse_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "notinsource" | "notintaxondata" => ExceptionCategory::NotInSource,
            "native" => ExceptionCategory::NativeStatus,
            "id" | "taxonid" => ExceptionCategory::ExternalId,
            "badid" => ExceptionCategory::IdMismatch,
            "translation" => ExceptionCategory::Translation,
            "rarity" => ExceptionCategory::Rarity,
            "legal" => ExceptionCategory::LegalStatus,
            "presence" => ExceptionCategory::Presence,
            _ => ExceptionCategory::Unrecognized(token.trim().to_string()),
        }
    }

    /// Token written in the exceptions file.
    pub fn token(&self) -> &str {
        match self {
            ExceptionCategory::NotInSource => "notinsource",
            ExceptionCategory::NativeStatus => "native",
            ExceptionCategory::ExternalId => "id",
            ExceptionCategory::IdMismatch => "badid",
            ExceptionCategory::Translation => "translation",
            ExceptionCategory::Rarity => "rarity",
            ExceptionCategory::LegalStatus => "legal",
            ExceptionCategory::Presence => "presence",
            ExceptionCategory::Unrecognized(token) => token,
        }
    }

    /// The compared field this category speaks about, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            ExceptionCategory::NativeStatus => Some(Field::NativeStatus),
            ExceptionCategory::ExternalId | ExceptionCategory::IdMismatch => Some(Field::ExternalId),
            ExceptionCategory::Rarity => Some(Field::Rarity),
            ExceptionCategory::LegalStatus => Some(Field::LegalStatus),
            ExceptionCategory::Presence => Some(Field::Presence),
            _ => None,
        }
    }

    /// The category that accepts a mismatch on `field`.
    pub fn accepting(field: Field) -> Self {
        match field {
            Field::NativeStatus => ExceptionCategory::NativeStatus,
            Field::ExternalId => ExceptionCategory::IdMismatch,
            Field::Rarity => ExceptionCategory::Rarity,
            Field::LegalStatus => ExceptionCategory::LegalStatus,
            Field::Presence => ExceptionCategory::Presence,
        }
    }

    /// Whether a subcategory qualifier is meaningful for this category.
    pub fn takes_subcategory(&self) -> bool {
        matches!(self, ExceptionCategory::Presence)
    }
}

impl fmt::Display for ExceptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Unique identity of an exception.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExceptionKey {
    pub taxon: String,
    pub source: String,
    pub category: ExceptionCategory,
    pub subcategory: Option<String>,
}

impl ExceptionKey {
    /// Create a key without a subcategory.
    pub fn new(taxon: impl Into<String>, source: impl Into<String>, category: ExceptionCategory) -> Self {
        Self {
            taxon: taxon.into(),
            source: source.into(),
            category,
            subcategory: None,
        }
    }

    /// Set the subcategory qualifier.
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Rule string as written in the exceptions file.
    pub fn rule(&self) -> String {
        match &self.subcategory {
            Some(sub) => format!("{}:{}", self.category.token(), sub),
            None => self.category.token().to_string(),
        }
    }
}

/// Value of an exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExceptionValue {
    /// Boolean override.
    Flag(bool),
    /// Replacement id or translated name.
    Text(String),
}

impl ExceptionValue {
    /// Whether the value asserts the exception at all. `false` disables it.
    pub fn is_set(&self) -> bool {
        match self {
            ExceptionValue::Flag(flag) => *flag,
            ExceptionValue::Text(text) => !text.trim().is_empty(),
        }
    }

    /// Text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ExceptionValue::Text(text) => Some(text.as_str()),
            ExceptionValue::Flag(_) => None,
        }
    }
}

impl fmt::Display for ExceptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceptionValue::Flag(flag) => write!(f, "{}", flag),
            ExceptionValue::Text(text) => f.write_str(text),
        }
    }
}

/// Whether an exception only applies to taxa in the loaded registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionScope {
    #[default]
    Local,
    /// Applies even when the taxon is absent from a subset registry.
    Global,
}

/// A curator-maintained override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    pub key: ExceptionKey,
    pub value: ExceptionValue,
    pub scope: ExceptionScope,
    pub note: Option<String>,
}

impl Exception {
    /// Create a local exception.
    pub fn new(key: ExceptionKey, value: ExceptionValue) -> Self {
        Self {
            key,
            value,
            scope: ExceptionScope::Local,
            note: None,
        }
    }

    /// Make the exception global.
    pub fn global(mut self) -> Self {
        self.scope = ExceptionScope::Global;
        self
    }

    /// Attach a curator note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether the exception is scoped global.
    pub fn is_global(&self) -> bool {
        self.scope == ExceptionScope::Global
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_aliases() {
        assert_eq!(ExceptionCategory::parse_token("notintaxondata"), ExceptionCategory::NotInSource);
        assert_eq!(ExceptionCategory::parse_token("NotInSource"), ExceptionCategory::NotInSource);
        assert_eq!(ExceptionCategory::parse_token("taxonid"), ExceptionCategory::ExternalId);
        assert_eq!(
            ExceptionCategory::parse_token("cesa"),
            ExceptionCategory::Unrecognized("cesa".to_string())
        );
    }

    #[test]
    fn test_rule_string() {
        let key = ExceptionKey::new("Salvia apiana", "rpi", ExceptionCategory::Presence)
            .with_subcategory("SBD");
        assert_eq!(key.rule(), "presence:SBD");
        let key = ExceptionKey::new("Salvia apiana", "rpi", ExceptionCategory::parse_token("taxonid"));
        assert_eq!(key.rule(), "id");
    }

    #[test]
    fn test_value_is_set() {
        assert!(ExceptionValue::Flag(true).is_set());
        assert!(!ExceptionValue::Flag(false).is_set());
        assert!(ExceptionValue::Text("12345".into()).is_set());
        assert!(!ExceptionValue::Text(" ".into()).is_set());
    }

    #[test]
    fn test_value_untagged_json() {
        let flag: ExceptionValue = serde_json::from_str("true").unwrap();
        assert_eq!(flag, ExceptionValue::Flag(true));
        let text: ExceptionValue = serde_json::from_str("\"Yucca whipplei\"").unwrap();
        assert_eq!(text.as_text(), Some("Yucca whipplei"));
    }
}
