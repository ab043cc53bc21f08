//! Built-in authority profiles.

use crate::error::{FloracheckError, Result};
use crate::names::{HybridStyle, NameStyle, SubspeciesToken};
use crate::recon::Field;
use crate::registry::NativeStatus;

use super::profile::{Coverage, FieldRule, SourceProfile, StatusTable, UntrackedFilter};

/// Ids of the built-in profiles, in display order.
pub const BUILTIN_IDS: &[&str] = &["calflora", "inat", "jepson", "rpi", "calipc", "fna"];

/// Resolve a built-in profile by source id.
pub fn builtin(id: &str) -> Result<SourceProfile> {
    match id {
        "calflora" => Ok(calflora()),
        "inat" => Ok(inat()),
        "jepson" => Ok(jepson()),
        "rpi" => Ok(rpi()),
        "calipc" => Ok(calipc()),
        "fna" => Ok(fna()),
        other => Err(FloracheckError::UnknownSource(other.to_string())),
    }
}

/// Every built-in profile.
pub fn all() -> Vec<SourceProfile> {
    vec![calflora(), inat(), jepson(), rpi(), calipc(), fna()]
}

fn native_introduced() -> StatusTable {
    StatusTable::new()
        .with("native", NativeStatus::Native)
        .with("n", NativeStatus::Native)
        .with("introduced", NativeStatus::Introduced)
        .with("x", NativeStatus::Introduced)
}

/// Calflora.
pub fn calflora() -> SourceProfile {
    let style = NameStyle::CANONICAL.with_hybrid(HybridStyle::Spaced);
    SourceProfile::new("calflora", "Calflora", style)
        .with_field(FieldRule::new(Field::NativeStatus))
        .with_field(FieldRule::new(Field::ExternalId).updatable())
        .with_status_table(native_introduced().with("not native", NativeStatus::Introduced))
}

/// iNaturalist. Infraspecies are keyed as bare trinomials.
pub fn inat() -> SourceProfile {
    let style = NameStyle::CANONICAL
        .with_subspecies(SubspeciesToken::Ssp)
        .with_rank_tokens(false)
        .with_hybrid(HybridStyle::Spaced);
    SourceProfile::new("inat", "iNaturalist", style)
        .with_field(FieldRule::new(Field::NativeStatus))
        .with_field(FieldRule::new(Field::ExternalId).updatable())
        .with_status_table(
            native_introduced()
                .with("endemic", NativeStatus::Native)
                .with("uncertain", NativeStatus::Uncertain),
        )
}

/// Jepson eFlora.
pub fn jepson() -> SourceProfile {
    SourceProfile::new("jepson", "Jepson eFlora", NameStyle::CANONICAL)
        .with_field(FieldRule::new(Field::NativeStatus))
        .with_field(FieldRule::new(Field::ExternalId).updatable())
        .with_status_table(
            native_introduced()
                .with("naturalized", NativeStatus::Introduced)
                .with("waif", NativeStatus::Introduced),
        )
}

/// CNPS Rare Plant Inventory. Lists rare taxa only.
pub fn rpi() -> SourceProfile {
    let style = NameStyle::CANONICAL.with_subspecies(SubspeciesToken::Ssp);
    SourceProfile::new("rpi", "CNPS Rare Plant Inventory", style)
        .with_field(FieldRule::new(Field::Rarity).updatable())
        .with_field(FieldRule::new(Field::LegalStatus).updatable())
        .with_field(FieldRule::new(Field::ExternalId).updatable())
        .with_field(FieldRule::new(Field::Presence))
        .with_untracked(UntrackedFilter::RareOnly)
        .with_coverage(Coverage::Rare)
}

/// California Invasive Plant Council inventory. Lists invasive taxa only.
pub fn calipc() -> SourceProfile {
    let table = StatusTable::new()
        .with("high", NativeStatus::Introduced)
        .with("moderate", NativeStatus::Introduced)
        .with("limited", NativeStatus::Introduced)
        .with("watch", NativeStatus::Introduced)
        .with("invasive", NativeStatus::Introduced)
        .with("native", NativeStatus::Native);
    SourceProfile::new("calipc", "Cal-IPC Inventory", NameStyle::CANONICAL)
        .with_field(FieldRule::new(Field::NativeStatus))
        .with_status_table(table)
        .with_untracked(UntrackedFilter::All)
        .with_coverage(Coverage::Partial)
}

/// Flora of North America.
pub fn fna() -> SourceProfile {
    let style = NameStyle::CANONICAL.with_hybrid(HybridStyle::Ascii);
    SourceProfile::new("fna", "Flora of North America", style)
        .with_field(FieldRule::new(Field::ExternalId).updatable())
        .with_untracked(UntrackedFilter::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ExceptionCategory;
    use crate::names::to_source_form;

    #[test]
    fn test_builtin_ids_resolve() {
        for id in BUILTIN_IDS {
            assert_eq!(builtin(id).unwrap().id, *id);
        }
        let ids: Vec<String> = all().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, BUILTIN_IDS);
    }

    #[test]
    fn test_unknown_source() {
        assert!(matches!(builtin("gbif"), Err(FloracheckError::UnknownSource(ref s)) if s == "gbif"));
    }

    #[test]
    fn test_profile_name_styles() {
        let name = "Quercus ×alvordiana";
        assert_eq!(to_source_form(name, &calflora().name_style), "Quercus × alvordiana");
        assert_eq!(to_source_form(name, &jepson().name_style), "Quercus ×alvordiana");
        assert_eq!(to_source_form(name, &fna().name_style), "Quercus x alvordiana");
        assert_eq!(
            to_source_form("Calochortus clavatus subsp. pallidus", &rpi().name_style),
            "Calochortus clavatus ssp. pallidus"
        );
        assert_eq!(
            to_source_form("Calochortus clavatus subsp. pallidus", &inat().name_style),
            "Calochortus clavatus pallidus"
        );
    }

    #[test]
    fn test_rpi_fields() {
        let rpi = rpi();
        assert!(rpi.field_rule(Field::Rarity).unwrap().update);
        assert!(!rpi.field_rule(Field::Presence).unwrap().update);
        assert!(rpi.field_rule(Field::NativeStatus).is_none());
        assert!(rpi.handles(&ExceptionCategory::LegalStatus));
        assert!(!rpi.handles(&ExceptionCategory::NativeStatus));
    }

    #[test]
    fn test_jepson_status_table() {
        let table = jepson().status_table;
        assert_eq!(table.classify("Naturalized"), Some(NativeStatus::Introduced));
        assert!(table.is_native("native"));
    }
}
