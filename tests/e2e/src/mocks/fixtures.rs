//! Test Data Factory
//!
//! Provides utilities for building hypergraphs and agent rigs for the
//! end-to-end scenario suite:
//! - Concept/link creation with configurable truth values
//! - Batch generation for population-pressure scenarios
//! - Pre-built orchestrator/loop rigs

use noetic_core::{
    builtin_tags, AgentHandle, AtomHandle, AtomStore, AttentionBank, BankConfig, CognitiveLoop,
    LoopConfig, Orchestrator, OrchestratorConfig, TruthValue,
};
use std::sync::Arc;

/// Factory for building stores, banks and agent rigs in test scenarios.
pub struct TestDataFactory;

impl TestDataFactory {
    // ========================================================================
    // ATOM CREATION
    // ========================================================================

    /// Add a named `CONCEPT` node with an explicit truth value.
    pub fn concept(store: &AtomStore, name: &str, strength: f64, confidence: f64) -> AtomHandle {
        store
            .add(
                builtin_tags::CONCEPT,
                Some(name),
                vec![],
                Some(TruthValue::new(strength, confidence).expect("valid truth value")),
            )
            .expect("concept creation never references unknown handles")
    }

    /// Add an untyped `CONCEPT` node with the default truth value.
    pub fn bare_concept(store: &AtomStore, name: &str) -> AtomHandle {
        store
            .add(builtin_tags::CONCEPT, Some(name), vec![], None)
            .expect("concept creation never references unknown handles")
    }

    /// Add a binary link of `type_tag` from `from` to `to`.
    pub fn link(
        store: &AtomStore,
        type_tag: &str,
        name: Option<&str>,
        from: AtomHandle,
        to: AtomHandle,
        strength: f64,
        confidence: f64,
    ) -> AtomHandle {
        store
            .add(
                type_tag,
                name,
                vec![from, to],
                Some(TruthValue::new(strength, confidence).expect("valid truth value")),
            )
            .expect("link creation references only known handles")
    }

    /// Add `count` bare concepts named `n0..n{count-1}`.
    pub fn batch_concepts(store: &AtomStore, count: usize) -> Vec<AtomHandle> {
        (0..count).map(|i| Self::bare_concept(store, &format!("n{i}"))).collect()
    }

    // ========================================================================
    // RIGS
    // ========================================================================

    /// A store/bank pair sharing the given bank configuration.
    pub fn store_and_bank(bank_config: BankConfig) -> (Arc<AtomStore>, Arc<AttentionBank>) {
        let store = Arc::new(AtomStore::default());
        let bank = Arc::new(AttentionBank::new(store.clone(), bank_config));
        (store, bank)
    }

    /// An orchestrator over a fresh store/bank pair, with no agents registered.
    pub fn orchestrator_rig(
        orchestrator_config: OrchestratorConfig,
    ) -> (Arc<AtomStore>, Arc<AttentionBank>, Arc<Orchestrator>) {
        let (store, bank) = Self::store_and_bank(BankConfig::default());
        let orchestrator = Arc::new(Orchestrator::new(store.clone(), bank.clone(), orchestrator_config));
        (store, bank, orchestrator)
    }

    /// A cognitive loop over a fresh orchestrator rig, with `agents` already
    /// registered.
    pub fn loop_rig(
        agents: Vec<Arc<AgentHandle>>,
        loop_config: LoopConfig,
    ) -> (Arc<AtomStore>, Arc<AttentionBank>, Arc<Orchestrator>, CognitiveLoop) {
        let (store, bank, orchestrator) = Self::orchestrator_rig(OrchestratorConfig::default());
        for agent in agents {
            orchestrator.add(agent);
        }
        let cognitive_loop = CognitiveLoop::new(orchestrator.clone(), bank.clone(), loop_config);
        (store, bank, orchestrator, cognitive_loop)
    }
}
