//! Agent — a named, stateful unit of work the orchestrator schedules.
//!
//! `Agent` itself is the bare `tick` capability; scheduling metadata
//! (frequency, priority, enabled flag, running counters) lives on
//! [`AgentHandle`], which every agent is wrapped in before it is handed to
//! an [`orchestrator::Orchestrator`].

pub mod attention_agent;
pub mod cognitive_loop;
pub mod orchestrator;
mod stats;

pub use attention_agent::AttentionAllocationAgent;
pub use stats::AgentStats;

use crate::bank::AttentionBank;
use crate::store::AtomStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Unique agent identifier, a UUID string unless the caller supplies one
/// (mirrors the teacher's `KnowledgeNode` id convention).
pub type AgentId = String;

fn new_agent_id() -> AgentId {
    uuid::Uuid::new_v4().to_string()
}

/// Outcome of one [`AgentHandle::execute`] call.
#[derive(Debug, Clone, Serialize)]
pub enum AgentOutcome {
    /// Disabled, or `shouldRun` returned false; `tick` was not invoked.
    Skipped,
    /// `tick` returned an error; captured as data, never propagated as a
    /// `Result::Err` into the orchestrator.
    Failure(String),
    /// `tick` completed; `summary` is a short, agent-defined description.
    Success { summary: String },
}

/// Construction options for [`AgentHandle::new`]. Mirrors spec §6.1's agent
/// constructor fields.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Explicit id; a fresh UUID is generated if omitted.
    pub id: Option<AgentId>,
    /// The agent is eligible on cycle `c` iff `c % frequency == 0`. Clamped to
    /// at least 1.
    pub frequency: u64,
    /// Higher runs earlier under the `priority`/`attention` scheduling policies.
    pub priority: i32,
    pub enabled: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: None,
            frequency: 1,
            priority: 0,
            enabled: true,
        }
    }
}

/// The single capability every scheduled unit of work exposes.
///
/// Object-safe via `async-trait`, so orchestrators can hold a homogeneous
/// `Vec<Arc<AgentHandle>>` over heterogeneous agent implementations
/// (inference, attention-allocation, pattern-mining, or a caller's own).
#[async_trait]
pub trait Agent: Send + Sync {
    /// Human-readable name; need not be unique (`AgentHandle::id` is).
    fn name(&self) -> &str;

    /// Perform one unit of work against the shared store and bank.
    ///
    /// `Err` marks a failed tick, captured by the orchestrator as
    /// [`AgentOutcome::Failure`] rather than aborting the batch.
    async fn tick(&self, store: &Arc<AtomStore>, bank: &Arc<AttentionBank>) -> Result<String, String>;
}

/// Wraps an [`Agent`] with the scheduling metadata and counters the
/// orchestrator needs: id, frequency, priority, enabled flag, and running
/// stats.
pub struct AgentHandle {
    pub id: AgentId,
    pub name: String,
    pub frequency: u64,
    pub priority: i32,
    enabled: AtomicBool,
    stats: Mutex<AgentStats>,
    agent: Box<dyn Agent>,
}

impl AgentHandle {
    pub fn new(agent: impl Agent + 'static, config: AgentConfig) -> Self {
        let name = agent.name().to_string();
        Self {
            id: config.id.unwrap_or_else(new_agent_id),
            name,
            frequency: config.frequency.max(1),
            priority: config.priority,
            enabled: AtomicBool::new(config.enabled),
            stats: Mutex::new(AgentStats::default()),
            agent: Box::new(agent),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn should_run(&self, cycle: u64) -> bool {
        cycle % self.frequency == 0
    }

    pub fn stats(&self) -> AgentStats {
        self.stats.lock().clone()
    }

    /// Run the execution contract: gate on enabled/`shouldRun`, time the
    /// call, update counters only on non-skipped executions.
    pub async fn execute(&self, store: &Arc<AtomStore>, bank: &Arc<AttentionBank>, cycle: u64) -> AgentOutcome {
        if !self.is_enabled() || !self.should_run(cycle) {
            return AgentOutcome::Skipped;
        }
        let start = Instant::now();
        let result = self.agent.tick(store, bank).await;
        let elapsed = start.elapsed();
        {
            let mut stats = self.stats.lock();
            stats.run_count += 1;
            stats.total_time += elapsed;
            stats.avg_time = stats.total_time / stats.run_count as u32;
            stats.last_run = Some(chrono::Utc::now());
        }
        match result {
            Ok(summary) => AgentOutcome::Success { summary },
            Err(message) => AgentOutcome::Failure(message),
        }
    }
}
