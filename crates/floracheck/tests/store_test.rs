//! File-backed collaborators: checklist, families, snapshots and reports.

use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use floracheck::profiles;
use floracheck::registry::load_families;
use floracheck::{
    run_reconciliation, DiscrepancyEntry, DiscrepancyKind, DiscrepancyLog, ExceptionStore, Field,
    FloracheckError, NativeStatus, ReconOptions, SnapshotAdapter, SourceAdapter, SourceIndex,
    SourceRecord, TaxaStore, TaxonRegistry, UpdateSet,
};

const TAXA: &str = "\
taxon_name,status,synonyms,rarity,legal_status,presence,id:calflora
Arctostaphylos glauca,N,Arctostaphylos glauca var. glauca,,,SDG,493
Dudleya stolonifera,N,,1B.1,\"CT,FT\",ORA,3010
Brassica nigra,X,,,,,
";

const FAMILIES: &str = "\
genus,family,section
Arctostaphylos,Ericaceae,Eudicots
Dudleya,Crassulaceae,Eudicots
";

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

// =============================================================================
// Checklist
// =============================================================================

#[test]
fn test_load_checklist() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "taxa.csv", TAXA);

    let store = TaxaStore::load(&path).expect("load checklist");
    assert_eq!(store.len(), 3);

    let registry = store.to_registry(false).unwrap();
    let dudleya = registry.lookup("Dudleya stolonifera").unwrap();
    assert_eq!(dudleya.rarity.as_deref(), Some("1B.1"));
    assert_eq!(dudleya.legal_status.len(), 2);
    assert_eq!(dudleya.id_for("calflora"), Some("3010"));

    let glauca = registry.lookup("Arctostaphylos glauca").unwrap();
    assert_eq!(glauca.synonyms[0].name, "Arctostaphylos glauca var. glauca");
    assert_eq!(registry.lookup("Brassica nigra").unwrap().status, NativeStatus::Introduced);
}

#[test]
fn test_duplicate_row_is_structural() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "taxa.csv",
        "taxon_name,status\nSalvia apiana,N\nSalvia  apiana,N\n",
    );
    let err = TaxaStore::load(&path).unwrap().to_registry(false).unwrap_err();
    assert!(matches!(err, FloracheckError::DuplicateTaxon(_)));
}

#[test]
fn test_missing_name_column() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "taxa.csv", "name,status\nSalvia apiana,N\n");
    assert!(matches!(TaxaStore::load(&path), Err(FloracheckError::Parse { row: 1, .. })));
}

#[test]
fn test_write_updates() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "taxa.csv", TAXA);
    let mut store = TaxaStore::load(&path).unwrap();

    let mut updates = UpdateSet::new("calflora");
    updates.insert("Brassica nigra", Field::ExternalId, "1211");
    updates.insert("Arctostaphylos glauca", Field::ExternalId, "493");
    let mut inat = UpdateSet::new("inat");
    inat.insert("Brassica nigra", Field::ExternalId, "55830");

    assert_eq!(store.write(&updates).unwrap(), 1);
    assert_eq!(store.write(&inat).unwrap(), 1);

    let reloaded = TaxaStore::load(&path).unwrap();
    assert_eq!(reloaded.cell("Brassica nigra", "id:calflora"), Some("1211"));
    assert_eq!(reloaded.cell("Brassica nigra", "id:inat"), Some("55830"));
    assert_eq!(reloaded.cell("Arctostaphylos glauca", "id:inat"), Some(""));
    assert_eq!(reloaded.cell("Dudleya stolonifera", "legal_status"), Some("CT,FT"));

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_write_unknown_taxon_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "taxa.csv", TAXA);
    let mut store = TaxaStore::load(&path).unwrap();

    let mut updates = UpdateSet::new("calflora");
    updates.insert("Arctostaphylos glauca", Field::ExternalId, "999");
    updates.insert("Salvia apiana", Field::ExternalId, "7392");

    assert!(matches!(store.write(&updates), Err(FloracheckError::Persistence(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), TAXA);
    assert_eq!(store.cell("Arctostaphylos glauca", "id:calflora"), Some("493"));
}

#[test]
fn test_write_updates_to_non_canonical_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "taxa.csv",
        "taxon_name,status,id:jepson\n\
         Calochortus clavatus ssp. pallidus,N,1\n\
         Quercus x alvordiana,N,\n",
    );
    let mut store = TaxaStore::load(&path).unwrap();
    let registry = store.to_registry(false).unwrap();
    assert!(registry.contains("Calochortus clavatus subsp. pallidus"));

    let mut index = SourceIndex::new("jepson");
    index.insert(SourceRecord::new("Calochortus clavatus subsp. pallidus").with_id("2"));
    index.insert(SourceRecord::new("Quercus ×alvordiana").with_id("40"));

    let outcome = run_reconciliation(
        &profiles::jepson(),
        &index,
        &registry,
        &ExceptionStore::new(),
        ReconOptions { update: true },
    )
    .unwrap();
    assert_eq!(
        outcome.updates.get("Calochortus clavatus subsp. pallidus", Field::ExternalId),
        Some("2")
    );
    assert_eq!(store.write(&outcome.updates).unwrap(), 2);

    let reloaded = TaxaStore::load(&path).unwrap();
    assert_eq!(reloaded.cell("Calochortus clavatus ssp. pallidus", "id:jepson"), Some("2"));
    assert_eq!(reloaded.cell("Quercus ×alvordiana", "id:jepson"), Some("40"));
    // The row keeps the spelling the curator wrote.
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("Calochortus clavatus ssp. pallidus,N,2"));
}

// =============================================================================
// Families
// =============================================================================

#[test]
fn test_load_families() {
    let dir = TempDir::new().unwrap();
    let taxa = write_file(&dir, "taxa.csv", TAXA);
    let families = write_file(&dir, "families.csv", FAMILIES);

    let mut registry: TaxonRegistry = TaxaStore::load(&taxa).unwrap().to_registry(false).unwrap();
    assert_eq!(load_families(&families, &mut registry).unwrap(), 2);

    assert_eq!(registry.family_of("Dudleya stolonifera").unwrap().name, "Crassulaceae");
    assert_eq!(registry.check_hierarchy(), vec!["Brassica nigra"]);
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_snapshot_adapter() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "name\tnative\tid\nArctostaphylos glauca\tnative\t493\nSalvia apiana\tnative\t7392\n"
    )
    .unwrap();

    let adapter = SnapshotAdapter::new("calflora", file.path());
    let index = adapter.fetch().unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.metadata.record_count, 2);
    assert!(index.metadata.hash.as_deref().unwrap().starts_with("sha256:"));
    assert_eq!(index.metadata.origin.as_deref(), Some(file.path()));

    let again = adapter.fetch().unwrap();
    assert_eq!(index.metadata.hash, again.metadata.hash);
}

#[test]
fn test_snapshot_missing_file() {
    let err = SnapshotAdapter::new("calflora", "/nonexistent/calflora.tsv")
        .fetch()
        .unwrap_err();
    assert!(matches!(err, FloracheckError::Source { ref source_id, .. } if source_id == "calflora"));
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_flush_creates_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports").join("calflora.tsv");

    let mut log = DiscrepancyLog::new();
    log.push(
        DiscrepancyEntry::new("Salvia apiana", DiscrepancyKind::FieldMismatch, "id differs from Calflora")
            .with_details(["1", "7392"]),
    );
    log.flush(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Salvia apiana\tid differs from Calflora\t1\t7392\n"
    );
}

#[test]
fn test_checklist_round_trip_through_run() {
    let dir = TempDir::new().unwrap();
    let taxa = write_file(&dir, "taxa.csv", TAXA);
    let snapshot = write_file(
        &dir,
        "calflora.tsv",
        "name\tnative\tid\n\
         Arctostaphylos glauca glauca\tnative\t493\n\
         Arctostaphylos glauca\tnative\t493\n\
         Dudleya stolonifera\tnative\t3011\n\
         Brassica nigra\tnot native\t1211\n",
    );

    let mut store = TaxaStore::load(&taxa).unwrap();
    let registry = store.to_registry(false).unwrap();
    let index = SnapshotAdapter::new("calflora", &snapshot).fetch().unwrap();
    let profile = profiles::calflora();

    let outcome = run_reconciliation(
        &profile,
        &index,
        &registry,
        &ExceptionStore::new(),
        ReconOptions { update: true },
    )
    .unwrap();
    assert_eq!(outcome.updates.len(), 2);
    store.write(&outcome.updates).unwrap();

    let registry = TaxaStore::load(&taxa).unwrap().to_registry(false).unwrap();
    let outcome = run_reconciliation(
        &profile,
        &index,
        &registry,
        &ExceptionStore::new(),
        ReconOptions::default(),
    )
    .unwrap();
    assert_eq!(outcome.discrepancies.count(DiscrepancyKind::FieldMismatch), 0);
}
