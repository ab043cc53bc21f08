//! Compared fields and their comparators.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::profiles::StatusTable;
use crate::registry::{NativeStatus, Taxon};
use crate::source::SourceRecord;

/// A field compared between the checklist and a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    NativeStatus,
    ExternalId,
    Rarity,
    LegalStatus,
    Presence,
}

impl Field {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Field::NativeStatus => "native status",
            Field::ExternalId => "id",
            Field::Rarity => "rarity",
            Field::LegalStatus => "legal status",
            Field::Presence => "presence",
        }
    }

    /// Checklist column holding this field for a source.
    pub fn column(&self, source: &str) -> String {
        match self {
            Field::NativeStatus => "status".to_string(),
            Field::ExternalId => format!("id:{}", source),
            Field::Rarity => "rarity".to_string(),
            Field::LegalStatus => "legal_status".to_string(),
            Field::Presence => "presence".to_string(),
        }
    }

    /// Comparator normally used for this field.
    pub fn default_comparator(&self) -> Comparator {
        match self {
            Field::NativeStatus => Comparator::Classification,
            Field::ExternalId | Field::Rarity => Comparator::Exact,
            Field::LegalStatus => Comparator::SetEquality,
            Field::Presence => Comparator::Overlap,
        }
    }

    /// Read the checklist value.
    pub fn local_value(&self, taxon: &Taxon, source: &str) -> FieldValue {
        match self {
            Field::NativeStatus => FieldValue::Status(Some(taxon.status)),
            Field::ExternalId => FieldValue::Text(taxon.id_for(source).map(str::to_string)),
            Field::Rarity => FieldValue::Text(taxon.rarity.clone()),
            Field::LegalStatus => FieldValue::Codes(taxon.legal_status.clone()),
            Field::Presence => FieldValue::Codes(taxon.presence.clone()),
        }
    }

    /// Read the source value.
    pub fn source_value(&self, record: &SourceRecord, table: &StatusTable) -> FieldValue {
        match self {
            Field::NativeStatus => {
                FieldValue::Status(record.native.as_deref().and_then(|raw| table.classify(raw)))
            }
            Field::ExternalId => FieldValue::Text(record.id.clone()),
            Field::Rarity => FieldValue::Text(record.rarity.clone()),
            Field::LegalStatus => FieldValue::Codes(record.legal.clone()),
            Field::Presence => FieldValue::Codes(record.presence.clone()),
        }
    }
}

/// How two values of a field are judged equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// String equality. A value missing from the source is not compared.
    Exact,
    /// Code sets must be identical.
    SetEquality,
    /// Code sets must share at least one code. Empty sets are not compared.
    Overlap,
    /// Native versus not native, after the source's status table.
    Classification,
}

/// A field value on either side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(Option<String>),
    Codes(BTreeSet<String>),
    Status(Option<NativeStatus>),
}

impl FieldValue {
    /// Render as a checklist cell.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone().unwrap_or_default(),
            FieldValue::Codes(codes) => codes.iter().cloned().collect::<Vec<_>>().join(","),
            FieldValue::Status(status) => status.map(|s| s.code().to_string()).unwrap_or_default(),
        }
    }

    /// Drop codes from a code set.
    pub fn without_codes<'a>(self, codes: impl IntoIterator<Item = &'a str>) -> Self {
        match self {
            FieldValue::Codes(mut set) => {
                for code in codes {
                    set.remove(code);
                }
                FieldValue::Codes(set)
            }
            other => other,
        }
    }
}

/// Outcome of comparing one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Differ { local: String, source: String },
    /// The source carries nothing to compare against.
    NotComparable,
}

/// Compare a checklist value with a source value.
pub fn compare(comparator: Comparator, local: &FieldValue, source: &FieldValue) -> Comparison {
    let differ = || Comparison::Differ {
        local: local.render(),
        source: source.render(),
    };

    match (comparator, local, source) {
        (Comparator::Exact, FieldValue::Text(_), FieldValue::Text(None)) => Comparison::NotComparable,
        (Comparator::Exact, FieldValue::Text(l), FieldValue::Text(s)) => {
            if l == s {
                Comparison::Equal
            } else {
                differ()
            }
        }
        (Comparator::SetEquality, FieldValue::Codes(l), FieldValue::Codes(s)) => {
            if l == s {
                Comparison::Equal
            } else {
                differ()
            }
        }
        (Comparator::Overlap, FieldValue::Codes(l), FieldValue::Codes(s)) => {
            if l.is_empty() || s.is_empty() {
                Comparison::NotComparable
            } else if l.intersection(s).next().is_some() {
                Comparison::Equal
            } else {
                differ()
            }
        }
        (
            Comparator::Classification,
            FieldValue::Status(Some(l)),
            FieldValue::Status(Some(s)),
        ) => {
            if *l == NativeStatus::Uncertain || *s == NativeStatus::Uncertain {
                Comparison::NotComparable
            } else if l.is_native() == s.is_native() {
                Comparison::Equal
            } else {
                differ()
            }
        }
        _ => Comparison::NotComparable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: Option<&str>) -> FieldValue {
        FieldValue::Text(v.map(str::to_string))
    }

    fn codes(v: &[&str]) -> FieldValue {
        FieldValue::Codes(v.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_exact() {
        assert_eq!(compare(Comparator::Exact, &text(Some("1")), &text(Some("1"))), Comparison::Equal);
        assert_eq!(
            compare(Comparator::Exact, &text(None), &text(Some("1"))),
            Comparison::Differ {
                local: String::new(),
                source: "1".into()
            }
        );
        assert_eq!(
            compare(Comparator::Exact, &text(Some("1")), &text(None)),
            Comparison::NotComparable
        );
    }

    #[test]
    fn test_set_equality() {
        assert_eq!(
            compare(Comparator::SetEquality, &codes(&["FT", "CE"]), &codes(&["CE", "FT"])),
            Comparison::Equal
        );
        assert_eq!(
            compare(Comparator::SetEquality, &codes(&["CE"]), &codes(&["CE", "FT"])),
            Comparison::Differ {
                local: "CE".into(),
                source: "CE,FT".into()
            }
        );
        assert_eq!(compare(Comparator::SetEquality, &codes(&[]), &codes(&[])), Comparison::Equal);
    }

    #[test]
    fn test_overlap() {
        assert_eq!(
            compare(Comparator::Overlap, &codes(&["SDG", "RIV"]), &codes(&["RIV", "ORA"])),
            Comparison::Equal
        );
        assert!(matches!(
            compare(Comparator::Overlap, &codes(&["SDG"]), &codes(&["ORA"])),
            Comparison::Differ { .. }
        ));
        assert_eq!(
            compare(Comparator::Overlap, &codes(&["SDG"]), &codes(&[])),
            Comparison::NotComparable
        );
    }

    #[test]
    fn test_classification() {
        let status = |s| FieldValue::Status(Some(s));
        assert_eq!(
            compare(
                Comparator::Classification,
                &status(NativeStatus::NativeQuestionable),
                &status(NativeStatus::Native)
            ),
            Comparison::Equal
        );
        assert_eq!(
            compare(
                Comparator::Classification,
                &status(NativeStatus::Native),
                &status(NativeStatus::Introduced)
            ),
            Comparison::Differ {
                local: "N".into(),
                source: "X".into()
            }
        );
        assert_eq!(
            compare(
                Comparator::Classification,
                &status(NativeStatus::Uncertain),
                &status(NativeStatus::Introduced)
            ),
            Comparison::NotComparable
        );
        assert_eq!(
            compare(
                Comparator::Classification,
                &status(NativeStatus::Native),
                &FieldValue::Status(None)
            ),
            Comparison::NotComparable
        );
    }

    #[test]
    fn test_without_codes() {
        let value = codes(&["SDG", "SBD"]).without_codes(["SBD"]);
        assert_eq!(value.render(), "SDG");
    }
}
