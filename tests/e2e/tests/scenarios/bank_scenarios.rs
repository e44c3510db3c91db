use noetic_core::BankConfig;
use noetic_e2e_tests::mocks::fixtures::TestDataFactory;

#[test]
fn normalization_hits_target_total() {
    let (store, bank) = TestDataFactory::store_and_bank(BankConfig {
        target_sti: 1000.0,
        ..Default::default()
    });
    let a = TestDataFactory::bare_concept(&store, "a");
    let b = TestDataFactory::bare_concept(&store, "b");
    bank.stimulate(a, 50.0).unwrap();
    bank.stimulate(b, 50.0).unwrap();

    bank.normalize_sti();

    let view_a = store.get(a).unwrap();
    let view_b = store.get(b).unwrap();
    assert!((view_a.importance.sti - 500.0).abs() < 1e-6);
    assert!((view_b.importance.sti - 500.0).abs() < 1e-6);
    assert!((bank.stats().total_sti - 1000.0).abs() < 1e-6);
}

#[test]
fn spread_importance_never_decreases_the_source() {
    let (store, bank) = TestDataFactory::store_and_bank(BankConfig::default());
    let source = TestDataFactory::bare_concept(&store, "source");
    let target = TestDataFactory::bare_concept(&store, "target");
    store.add("LINK", None, vec![source, target], None).unwrap();
    bank.stimulate(source, 100.0).unwrap();

    let before = store.get(source).unwrap().importance.sti;
    bank.spread_importance(0.2).unwrap();
    let after = store.get(source).unwrap().importance.sti;

    assert!(after >= before);
    assert!(store.get(target).unwrap().importance.sti > 0.0);
}
