//! Quantified invariants from the testable-properties section that are not
//! already exercised by a literal-value scenario above.

use noetic_core::{Agent, AgentConfig, AgentHandle, BankConfig, OrchestratorConfig};
use noetic_e2e_tests::mocks::fixtures::TestDataFactory;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

struct CountingAgent {
    runs: Arc<AtomicU64>,
}

#[async_trait::async_trait]
impl Agent for CountingAgent {
    fn name(&self) -> &str {
        "counting"
    }

    async fn tick(
        &self,
        _store: &Arc<noetic_core::AtomStore>,
        _bank: &Arc<noetic_core::AttentionBank>,
    ) -> Result<String, String> {
        self.runs.fetch_add(1, Ordering::Relaxed);
        Ok("ticked".to_string())
    }
}

// Invariant 3: after any sequence of stimulate/decay/normalize, every STI
// lies in [stiMin, stiMax] and totalSTI equals the sum of individual STIs.
#[test]
fn sti_stays_bounded_and_totals_match_after_mixed_operations() {
    let (store, bank) = TestDataFactory::store_and_bank(BankConfig {
        sti_min: -100.0,
        sti_max: 100.0,
        decay_rate: 0.8,
        ..Default::default()
    });
    let handles = TestDataFactory::batch_concepts(&store, 5);
    for (i, handle) in handles.iter().enumerate() {
        bank.stimulate(*handle, 1_000.0 * (i as f64 + 1.0)).unwrap();
    }
    for _ in 0..5 {
        bank.decay_sti();
    }
    bank.normalize_sti();

    let mut observed_total = 0.0;
    for handle in &handles {
        let view = store.get(*handle).unwrap();
        assert!((-100.0..=100.0).contains(&view.importance.sti));
        observed_total += view.importance.sti;
    }
    assert!((observed_total - bank.stats().total_sti).abs() < 1e-6);
}

// Invariant 10: an agent with frequency = k executes on cycles {k, 2k, 3k, ...}
// only, given the orchestrator numbers cycles from 1.
#[tokio::test]
async fn frequency_k_agent_runs_only_on_multiples_of_k() {
    let (_, _, orchestrator) = TestDataFactory::orchestrator_rig(OrchestratorConfig::default());
    let runs = Arc::new(AtomicU64::new(0));
    orchestrator.add(Arc::new(AgentHandle::new(
        CountingAgent { runs: runs.clone() },
        AgentConfig {
            frequency: 3,
            ..Default::default()
        },
    )));

    for _ in 0..9 {
        orchestrator.run_cycle().await;
    }

    // Cycles 1..=9 with frequency 3 run on {3, 6, 9}.
    assert_eq!(runs.load(Ordering::Relaxed), 3);
}
