use noetic_core::{builtin_tags, AtomStore, InferenceConfig, InferenceEngine, PatternQuery};
use noetic_e2e_tests::mocks::fixtures::TestDataFactory;
use std::sync::Arc;

#[test]
fn forward_chaining_derives_transitive_implication_with_literal_values() {
    let store = Arc::new(AtomStore::default());
    let cat = TestDataFactory::bare_concept(&store, "cat");
    let mammal = TestDataFactory::bare_concept(&store, "mammal");
    let animal = TestDataFactory::bare_concept(&store, "animal");
    TestDataFactory::link(&store, builtin_tags::IMPLICATION, None, cat, mammal, 0.9, 0.9);
    TestDataFactory::link(&store, builtin_tags::IMPLICATION, None, mammal, animal, 0.95, 0.95);

    let engine = InferenceEngine::new(store.clone(), InferenceConfig::default());
    engine.forward_chain(5);

    let derived = store
        .pattern_match(&PatternQuery::new().and_type(builtin_tags::IMPLICATION))
        .into_iter()
        .filter_map(|h| store.get(h).map(|v| (h, v)))
        .find(|(_, v)| v.outgoing == [cat, animal])
        .map(|(_, v)| v)
        .expect("cat -> animal should have been derived");

    assert!((derived.truth_value.strength() - 0.855).abs() < 1e-9);
    assert!((derived.truth_value.confidence() - 0.81).abs() < 1e-9);
}

#[test]
fn forward_chaining_never_produces_out_of_range_truth_values() {
    let store = Arc::new(AtomStore::default());
    let handles = TestDataFactory::batch_concepts(&store, 6);
    for pair in handles.windows(2) {
        TestDataFactory::link(&store, builtin_tags::IMPLICATION, None, pair[0], pair[1], 0.7, 0.6);
    }

    let config = InferenceConfig::default();
    let engine = InferenceEngine::new(store.clone(), config.clone());
    let report = engine.forward_chain(config.inference_depth);

    for handle in store.pattern_match(&PatternQuery::new().and_type(builtin_tags::IMPLICATION)) {
        let view = store.get(handle).unwrap();
        assert!((0.0..=1.0).contains(&view.truth_value.strength()));
        assert!((0.0..=1.0).contains(&view.truth_value.confidence()));
        if view.truth_value.confidence() > 0.0 {
            assert!(view.truth_value.confidence() >= config.min_confidence - 1e-9);
        }
    }
    assert!(report.inferences_performed <= config.max_inferences);
}
