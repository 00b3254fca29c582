//! Ecology rules over whole catalogs and replaceable rule tables.

mod common;

use common::mixed_catalog;
use std::fs;
use tempfile::TempDir;
use warband::{
    ClassifierTables, Creature, CreatureClassifier, EcologyTables, EcologyValidator, Terrain,
    TerrainRelations, WarbandResult,
};

#[test]
fn test_every_creature_coexists_with_itself() {
    let ecology = EcologyValidator::default();
    for creature in mixed_catalog().creatures() {
        assert!(ecology.can_creatures_coexist(creature, creature), "{}", creature.name);
    }
}

#[test]
fn test_solitary_creatures_reject_other_species() {
    let ecology = EcologyValidator::default();
    let solitary: Vec<Creature> = ["Tiger", "Owlbear", "Lich", "Wyvern"]
        .iter()
        .map(|name| Creature::new(name, 5, &[]))
        .collect();

    for loner in &solitary {
        assert!(ecology.is_solitary(loner));
        for other in mixed_catalog().creatures() {
            assert!(!ecology.can_creatures_coexist(loner, other), "{} with {}", loner.name, other.name);
        }
    }
}

#[test]
fn test_coexistence_is_symmetric() {
    let ecology = EcologyValidator::default();
    let catalog = mixed_catalog();
    for a in catalog.creatures() {
        for b in catalog.creatures() {
            assert_eq!(
                ecology.can_creatures_coexist(a, b),
                ecology.can_creatures_coexist(b, a),
                "{} / {}",
                a.name,
                b.name
            );
        }
    }
}

#[test]
fn test_terrain_counts_cover_catalog() {
    let ecology = EcologyValidator::default();
    let catalog = mixed_catalog();
    let counts = catalog.terrain_counts(ecology.classifier());
    assert_eq!(counts.values().sum::<usize>(), catalog.len());
    assert!(counts.get(&Terrain::Forest).copied().unwrap_or(0) >= 2);
}

#[test]
fn test_ecology_tables_load_from_json() -> WarbandResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("ecology.json");

    let mut tables = EcologyTables::default();
    let zombie = tables
        .relationships
        .iter_mut()
        .find(|r| r.name == "Zombie")
        .expect("zombie relationship");
    zombie.solitary = true;
    fs::write(&path, serde_json::to_string_pretty(&tables)?)?;

    let loaded = EcologyTables::from_json_file(&path)?;
    assert_eq!(loaded, tables);

    let skeleton = Creature::new("Skeleton", 0, &["undead", "mindless"]);
    let zombie = Creature::new("Zombie", -1, &["undead", "mindless"]);

    let stock = EcologyValidator::default();
    assert!(stock.can_creatures_coexist(&skeleton, &zombie));

    let custom = EcologyValidator::new(CreatureClassifier::default(), loaded, TerrainRelations::default());
    assert!(!custom.can_creatures_coexist(&skeleton, &zombie));
    Ok(())
}

#[test]
fn test_classifier_tables_load_from_json() -> WarbandResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("classifier.json");

    let mut tables = ClassifierTables::default();
    let forest = tables
        .terrains
        .iter_mut()
        .find(|group| group.terrain == Terrain::Forest)
        .expect("forest keywords");
    forest.primary.push("glade".to_string());
    fs::write(&path, serde_json::to_string(&tables)?)?;

    let classifier = CreatureClassifier::new(ClassifierTables::from_json_file(&path)?);
    let runner = Creature::new("Glade Runner", 2, &["humanoid"]);
    assert_eq!(classifier.preferred_terrain(&runner), Terrain::Forest);
    Ok(())
}

#[test]
fn test_malformed_tables_are_rejected() -> WarbandResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"relationships\": 7}")?;
    assert!(EcologyTables::from_json_file(&path).is_err());
    assert!(ClassifierTables::from_json_file(&dir.path().join("missing.json")).is_err());
    Ok(())
}
