use noetic_core::{builtin_tags, AtomStore, AttentionBank, BankConfig, StoreConfig};
use noetic_e2e_tests::mocks::fixtures::TestDataFactory;
use std::sync::Arc;

#[test]
fn deduplication_merges_truth_values() {
    let store = AtomStore::default();
    let first = TestDataFactory::concept(&store, "cat", 0.8, 0.9);
    let second = TestDataFactory::concept(&store, "cat", 0.4, 0.5);

    assert_eq!(first, second, "duplicate (type, name, outgoing) must resolve to the same atom");
    assert_eq!(store.size(), 1);

    let view = store.get(first).unwrap();
    assert!((view.truth_value.strength() - 0.6).abs() < 1e-9);
    assert!((view.truth_value.confidence() - 0.9).abs() < 1e-9);
}

#[test]
fn incoming_set_maintenance_and_cascade_removal() {
    let store = AtomStore::default();
    let cat = TestDataFactory::bare_concept(&store, "cat");
    let animal = TestDataFactory::bare_concept(&store, "animal");
    let link = TestDataFactory::link(&store, builtin_tags::INHERITANCE, Some("l"), cat, animal, 0.5, 0.0);

    assert_eq!(store.get(cat).unwrap().incoming, vec![link]);
    assert_eq!(store.get(animal).unwrap().incoming, vec![link]);

    assert!(store.remove(link));
    assert!(store.get(cat).unwrap().incoming.is_empty());
    assert!(store.get(animal).unwrap().incoming.is_empty());
    assert!(store.get(cat).is_some());
    assert!(store.get(animal).is_some());
}

#[test]
fn eviction_respects_vlti_at_population_pressure() {
    let store = Arc::new(AtomStore::new(StoreConfig {
        max_size: 5,
        forgetting_enabled: true,
    }));
    let bank = AttentionBank::new(store.clone(), BankConfig::default());

    // Add and immediately stamp each atom's STI before adding the next, so
    // eviction (which can run on every `add` past maxSize) sees the same
    // population ordering the scenario describes.
    let mut handles = Vec::new();
    for sti in 0..10 {
        let handle = TestDataFactory::bare_concept(&store, &format!("n{sti}"));
        bank.stimulate(handle, sti as f64).unwrap();
        if sti == 0 {
            bank.set_vlti(handle, true).unwrap();
        }
        handles.push(handle);
    }

    assert_eq!(store.size(), 5, "eviction must bring the store back to maxSize");
    assert!(store.get(handles[0]).is_some(), "the VLTI-protected atom must survive");
    assert!(store.get(handles[9]).is_some(), "the highest-STI atom must survive");
}
