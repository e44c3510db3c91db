use noetic_core::{BankEvent, LoopConfig, LoopEvent, LoopState};
use noetic_e2e_tests::mocks::fixtures::TestDataFactory;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread")]
async fn cycle_cap_and_maintenance_cadence() {
    let (store, bank, _orchestrator, cognitive_loop) = TestDataFactory::loop_rig(
        vec![],
        LoopConfig {
            cycle_interval: Duration::from_millis(10),
            max_cycles: Some(25),
            auto_decay: true,
            auto_normalize: false,
            decay_interval: 10,
            normalize_interval: u64::MAX,
        },
    );
    // decaySTI is a no-op on an all-zero store; give it something to decay
    // so each triggered call is observable as a `Decayed` bank event.
    let atom = TestDataFactory::bare_concept(&store, "kept-warm");
    bank.stimulate(atom, 100.0).unwrap();

    let mut loop_events = cognitive_loop.subscribe();
    let mut bank_events = bank.subscribe();
    cognitive_loop.start();

    let mut completed = 0u64;
    let mut reached_max = false;
    while let Ok(event) = tokio::time::timeout(Duration::from_secs(5), loop_events.recv())
        .await
        .expect("loop should not hang")
    {
        match event {
            LoopEvent::CycleComplete { .. } => completed += 1,
            LoopEvent::MaxCyclesReached { total_cycles } => {
                assert_eq!(total_cycles, 25);
                reached_max = true;
                break;
            }
            _ => {}
        }
    }

    assert_eq!(completed, 25, "exactly maxCycles cycle-complete events must fire");
    assert!(reached_max);
    assert_eq!(cognitive_loop.stats().state, LoopState::Stopped);

    let mut decayed_count = 0;
    while let Ok(event) = bank_events.try_recv() {
        if matches!(event, BankEvent::Decayed { .. }) {
            decayed_count += 1;
        }
    }
    assert_eq!(decayed_count, 2, "decaySTI must run on cycles 10 and 20 only");
}

#[tokio::test]
async fn run_single_cycle_applies_maintenance_immediately() {
    let (store, bank, _orchestrator, cognitive_loop) = TestDataFactory::loop_rig(
        vec![],
        LoopConfig {
            auto_decay: true,
            decay_interval: 1,
            ..LoopConfig::default()
        },
    );
    let atom = TestDataFactory::bare_concept(&store, "a");
    bank.stimulate(atom, 10.0).unwrap();

    let summary = cognitive_loop.run_single_cycle().await;
    assert_eq!(summary.cycle, 1);
    assert_eq!(cognitive_loop.stats().total_cycles, 1);
}
