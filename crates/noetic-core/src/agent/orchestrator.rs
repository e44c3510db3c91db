//! Orchestrator — runs eligible agents each cycle with bounded concurrency.

use super::{AgentHandle, AgentId, AgentOutcome};
use crate::bank::AttentionBank;
use crate::store::{AtomStore, EVENT_CHANNEL_CAPACITY};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// How eligible agents are ordered within a cycle before being split into
/// batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingPolicy {
    /// Descending priority.
    Priority,
    /// Insertion order.
    RoundRobin,
    /// Descending priority, with ties left to the orchestrator's
    /// implementation (currently: stable, insertion order).
    Attention,
}

/// Configuration accepted by [`Orchestrator::new`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on in-flight ticks per batch.
    pub max_concurrent: usize,
    pub scheduling_policy: SchedulingPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            scheduling_policy: SchedulingPolicy::Priority,
        }
    }
}

/// Read-only snapshot of orchestrator-wide counters.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorStats {
    pub current_cycle: u64,
    pub total_successes: u64,
    pub total_failures: u64,
    pub total_skipped: u64,
    pub agent_count: usize,
}

/// Aggregated result of one [`Orchestrator::run_cycle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub cycle: u64,
    pub successes: usize,
    pub failures: usize,
    pub skipped: usize,
}

/// Events emitted by [`Orchestrator`].
#[derive(Debug, Clone, Serialize)]
pub enum OrchestratorEvent {
    CycleStart { cycle: u64, agent_ids: Vec<AgentId> },
    AgentStarted { cycle: u64, agent_id: AgentId },
    AgentFinished { cycle: u64, agent_id: AgentId, outcome: AgentOutcome },
    CycleEnd { cycle: u64, successes: usize, failures: usize, skipped: usize },
}

struct OrchestratorState {
    agents: Vec<Arc<AgentHandle>>,
    current_cycle: u64,
    total_successes: u64,
    total_failures: u64,
    total_skipped: u64,
}

/// Holds a set of agents and drives them through cycles, materialising the
/// eligible set at the start of each cycle so concurrent set mutation never
/// affects a cycle already underway (spec §4.4).
pub struct Orchestrator {
    state: Mutex<OrchestratorState>,
    config: OrchestratorConfig,
    events: broadcast::Sender<OrchestratorEvent>,
    store: Arc<AtomStore>,
    bank: Arc<AttentionBank>,
}

impl Orchestrator {
    pub fn new(store: Arc<AtomStore>, bank: Arc<AttentionBank>, config: OrchestratorConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(OrchestratorState {
                agents: Vec::new(),
                current_cycle: 0,
                total_successes: 0,
                total_failures: 0,
                total_skipped: 0,
            }),
            config,
            events,
            store,
            bank,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events.subscribe()
    }

    pub fn add(&self, agent: Arc<AgentHandle>) {
        self.state.lock().agents.push(agent);
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        let before = state.agents.len();
        state.agents.retain(|a| a.id != id);
        state.agents.len() != before
    }

    pub fn enable(&self, id: &str) -> bool {
        let state = self.state.lock();
        match state.agents.iter().find(|a| a.id == id) {
            Some(agent) => {
                agent.enable();
                true
            }
            None => false,
        }
    }

    pub fn disable(&self, id: &str) -> bool {
        let state = self.state.lock();
        match state.agents.iter().find(|a| a.id == id) {
            Some(agent) => {
                agent.disable();
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> OrchestratorStats {
        let state = self.state.lock();
        OrchestratorStats {
            current_cycle: state.current_cycle,
            total_successes: state.total_successes,
            total_failures: state.total_failures,
            total_skipped: state.total_skipped,
            agent_count: state.agents.len(),
        }
    }

    /// Resets cycle counters, not the agent set.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.current_cycle = 0;
        state.total_successes = 0;
        state.total_failures = 0;
        state.total_skipped = 0;
    }

    /// Increment the cycle counter, select and order eligible agents, run
    /// them in bounded batches, and report the aggregated result.
    ///
    /// Two concurrent calls to `run_cycle` are impossible by construction:
    /// the whole method runs under `&self` and the store/bank it drives are
    /// themselves single-lock-serialized, so a second caller simply observes
    /// the prior cycle's effects once its own call begins.
    pub async fn run_cycle(&self) -> CycleSummary {
        let (cycle, selected, not_selected) = {
            let mut state = self.state.lock();
            state.current_cycle += 1;
            let cycle = state.current_cycle;
            let mut selected: Vec<Arc<AgentHandle>> = Vec::new();
            let mut not_selected = 0usize;
            for agent in &state.agents {
                if agent.is_enabled() && agent.should_run(cycle) {
                    selected.push(agent.clone());
                } else {
                    // Disabled, or not due this cycle under its frequency gate:
                    // `tick` is never invoked for these, so they are counted as
                    // skipped directly rather than being batched and run
                    // through `AgentHandle::execute` only to observe the same
                    // skip outcome there.
                    not_selected += 1;
                }
            }
            match self.config.scheduling_policy {
                SchedulingPolicy::Priority | SchedulingPolicy::Attention => {
                    selected.sort_by(|a, b| b.priority.cmp(&a.priority));
                }
                SchedulingPolicy::RoundRobin => {}
            }
            (cycle, selected, not_selected)
        };

        let agent_ids: Vec<AgentId> = selected.iter().map(|a| a.id.clone()).collect();
        debug!(cycle, agents = agent_ids.len(), "cycle starting");
        let _ = self.events.send(OrchestratorEvent::CycleStart {
            cycle,
            agent_ids,
        });

        let mut successes = 0usize;
        let mut failures = 0usize;
        let mut skipped = not_selected;
        let batch_size = self.config.max_concurrent.max(1);

        for batch in selected.chunks(batch_size) {
            let mut set = JoinSet::new();
            for agent in batch.iter().cloned() {
                let store = self.store.clone();
                let bank = self.bank.clone();
                let events = self.events.clone();
                set.spawn(async move {
                    let _ = events.send(OrchestratorEvent::AgentStarted {
                        cycle,
                        agent_id: agent.id.clone(),
                    });
                    let outcome = agent.execute(&store, &bank, cycle).await;
                    let _ = events.send(OrchestratorEvent::AgentFinished {
                        cycle,
                        agent_id: agent.id.clone(),
                        outcome: outcome.clone(),
                    });
                    outcome
                });
            }
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok(AgentOutcome::Success { .. }) => successes += 1,
                    Ok(AgentOutcome::Failure(_)) => failures += 1,
                    Ok(AgentOutcome::Skipped) => skipped += 1,
                    Err(join_err) => {
                        warn!(%join_err, "agent task panicked; isolating from the rest of the batch");
                        failures += 1;
                    }
                }
            }
        }

        {
            let mut state = self.state.lock();
            state.total_successes += successes as u64;
            state.total_failures += failures as u64;
            state.total_skipped += skipped as u64;
        }

        info!(cycle, successes, failures, skipped, "cycle complete");
        let _ = self.events.send(OrchestratorEvent::CycleEnd {
            cycle,
            successes,
            failures,
            skipped,
        });

        CycleSummary {
            cycle,
            successes,
            failures,
            skipped,
        }
    }
}
