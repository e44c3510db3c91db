//! Built-in attention-allocation agent: restimulates the current focus and
//! spreads importance through it each eligible tick.

use super::Agent;
use crate::bank::AttentionBank;
use crate::store::AtomStore;
use async_trait::async_trait;
use std::sync::Arc;

/// Keeps the top-`focus_size` atoms topped up and redistributes their
/// importance to neighbours on every tick it runs.
///
/// This is the one concrete, non-inference agent the core ships — the
/// attention-allocation variant named alongside inference and
/// pattern-mining in the component overview. Domain-specific agents
/// (profiler, NLP, planner, ...) are out of scope; callers supply those
/// themselves via [`Agent`].
pub struct AttentionAllocationAgent {
    restimulation: f64,
    diffusion: f64,
}

impl AttentionAllocationAgent {
    /// `restimulation` is added to each focus atom's STI before spreading;
    /// `diffusion` is passed through to `spreadImportance`.
    pub fn new(restimulation: f64, diffusion: f64) -> Self {
        Self {
            restimulation,
            diffusion,
        }
    }
}

impl Default for AttentionAllocationAgent {
    fn default() -> Self {
        Self::new(1.0, 0.1)
    }
}

#[async_trait]
impl Agent for AttentionAllocationAgent {
    fn name(&self) -> &str {
        "attention-allocation"
    }

    async fn tick(&self, store: &Arc<AtomStore>, bank: &Arc<AttentionBank>) -> Result<String, String> {
        let focus = bank.focus(bank.stats().focus_size.max(1)).map_err(|e| e.to_string())?;
        for handle in &focus {
            bank.stimulate(*handle, self.restimulation).map_err(|e| e.to_string())?;
        }
        bank.spread_importance(self.diffusion).map_err(|e| e.to_string())?;
        let _ = store.size();
        Ok(format!("restimulated {} focus atoms", focus.len()))
    }
}
