//! Cognitive loop — drives orchestrator cycles on a timer and interleaves
//! periodic decay/normalisation.

use super::orchestrator::{CycleSummary, Orchestrator};
use crate::bank::AttentionBank;
use crate::store::EVENT_CHANNEL_CAPACITY;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// The loop's state machine. See spec §4.4 for the transition diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopState {
    Stopped,
    Running,
    Paused,
}

/// Configuration accepted by [`CognitiveLoop::new`].
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Time between tick scheduling.
    pub cycle_interval: Duration,
    /// Cap on total cycles before auto-stop. `None` means unbounded.
    pub max_cycles: Option<u64>,
    /// Gate periodic `decaySTI` calls.
    pub auto_decay: bool,
    /// Gate periodic `normalizeSTI`/`normalizeLTI` calls.
    pub auto_normalize: bool,
    /// Cycle counts between `decaySTI` calls.
    pub decay_interval: u64,
    /// Cycle counts between normalisation calls.
    pub normalize_interval: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_millis(100),
            max_cycles: None,
            auto_decay: true,
            auto_normalize: true,
            decay_interval: 10,
            normalize_interval: 20,
        }
    }
}

/// Read-only snapshot of the loop's state and counters.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStats {
    pub state: LoopState,
    pub total_cycles: u64,
    pub total_time: Duration,
    pub started_at: Option<DateTime<Utc>>,
}

/// Events emitted by [`CognitiveLoop`].
#[derive(Debug, Clone, Serialize)]
pub enum LoopEvent {
    Started,
    CycleComplete { cycle: u64, summary: CycleSummary },
    MaxCyclesReached { total_cycles: u64 },
    Paused,
    Resumed,
    Stopped { total_cycles: u64, total_time: Duration },
    CycleError { message: String },
}

struct LoopInner {
    state: LoopState,
    total_cycles: u64,
    total_time: Duration,
    started_at: Option<DateTime<Utc>>,
    config: LoopConfig,
}

fn run_maintenance(bank: &AttentionBank, cycle: u64, config: &LoopConfig) {
    if config.auto_decay && config.decay_interval > 0 && cycle % config.decay_interval == 0 {
        bank.decay_sti();
    }
    if config.auto_normalize && config.normalize_interval > 0 && cycle % config.normalize_interval == 0 {
        bank.normalize_sti();
        bank.normalize_lti();
    }
}

/// Drives an [`Orchestrator`] on a monotonic timer. `start`/`stop` spawn and
/// cooperatively tear down a background task; `pause`/`resume` merely
/// suppress or resume ticking on that same task without restarting it.
pub struct CognitiveLoop {
    inner: Arc<Mutex<LoopInner>>,
    orchestrator: Arc<Orchestrator>,
    bank: Arc<AttentionBank>,
    events: broadcast::Sender<LoopEvent>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl CognitiveLoop {
    pub fn new(orchestrator: Arc<Orchestrator>, bank: Arc<AttentionBank>, config: LoopConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(LoopInner {
                state: LoopState::Stopped,
                total_cycles: 0,
                total_time: Duration::ZERO,
                started_at: None,
                config,
            })),
            orchestrator,
            bank,
            events,
            driver: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LoopEvent> {
        self.events.subscribe()
    }

    pub fn stats(&self) -> LoopStats {
        let inner = self.inner.lock();
        LoopStats {
            state: inner.state,
            total_cycles: inner.total_cycles,
            total_time: inner.total_time,
            started_at: inner.started_at,
        }
    }

    pub fn set_cycle_interval(&self, interval: Duration) {
        self.inner.lock().config.cycle_interval = interval;
    }

    /// `STOPPED -> RUNNING`. A no-op if the loop is already running or paused.
    pub fn start(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.state != LoopState::Stopped {
                return;
            }
            inner.state = LoopState::Running;
            inner.total_cycles = 0;
            inner.total_time = Duration::ZERO;
            inner.started_at = Some(Utc::now());
        }

        let inner_arc = self.inner.clone();
        let orchestrator = self.orchestrator.clone();
        let bank = self.bank.clone();
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            loop {
                let interval = inner_arc.lock().config.cycle_interval;
                tokio::time::sleep(interval).await;

                let state_now = inner_arc.lock().state;
                match state_now {
                    LoopState::Stopped => {
                        let (total_cycles, total_time) = {
                            let inner = inner_arc.lock();
                            (inner.total_cycles, inner.total_time)
                        };
                        let _ = events.send(LoopEvent::Stopped { total_cycles, total_time });
                        break;
                    }
                    LoopState::Paused => continue,
                    LoopState::Running => {}
                }

                let start = std::time::Instant::now();
                let cycle_task = {
                    let orchestrator = orchestrator.clone();
                    tokio::spawn(async move { orchestrator.run_cycle().await })
                };
                let joined = cycle_task.await;
                let elapsed = start.elapsed();

                let summary = match joined {
                    Ok(summary) => summary,
                    Err(join_err) => {
                        warn!(%join_err, "cycle panicked; loop continues");
                        let _ = events.send(LoopEvent::CycleError {
                            message: join_err.to_string(),
                        });
                        continue;
                    }
                };

                let (cycle, max_cycles, config_snapshot) = {
                    let mut inner = inner_arc.lock();
                    inner.total_cycles += 1;
                    inner.total_time += elapsed;
                    (inner.total_cycles, inner.config.max_cycles, inner.config.clone())
                };

                let _ = events.send(LoopEvent::CycleComplete { cycle, summary });
                run_maintenance(&bank, cycle, &config_snapshot);

                if let Some(max) = max_cycles {
                    if cycle >= max {
                        let mut inner = inner_arc.lock();
                        inner.state = LoopState::Stopped;
                        let total_cycles = inner.total_cycles;
                        drop(inner);
                        info!(total_cycles, "max cycles reached");
                        let _ = events.send(LoopEvent::MaxCyclesReached { total_cycles });
                        break;
                    }
                }
            }
        });

        *self.driver.lock() = Some(handle);
        let _ = self.events.send(LoopEvent::Started);
    }

    /// `RUNNING -> PAUSED`. Subsequent ticks are suppressed; counters preserved.
    pub fn pause(&self) {
        let mut inner = self.inner.lock();
        if inner.state == LoopState::Running {
            inner.state = LoopState::Paused;
            drop(inner);
            let _ = self.events.send(LoopEvent::Paused);
        }
    }

    /// `PAUSED -> RUNNING`.
    pub fn resume(&self) {
        let mut inner = self.inner.lock();
        if inner.state == LoopState::Paused {
            inner.state = LoopState::Running;
            drop(inner);
            let _ = self.events.send(LoopEvent::Resumed);
        }
    }

    /// `RUNNING|PAUSED -> STOPPED`. Cooperative: prevents the next tick from
    /// being scheduled but does not interrupt a cycle already in flight. The
    /// driver task emits `Stopped` with final totals once it actually quiesces.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if inner.state != LoopState::Stopped {
            inner.state = LoopState::Stopped;
        }
    }

    /// Run one cycle immediately, independent of the timer, applying the
    /// same maintenance cadence the driven loop would.
    pub async fn run_single_cycle(&self) -> CycleSummary {
        let summary = self.orchestrator.run_cycle().await;
        let (cycle, config_snapshot) = {
            let mut inner = self.inner.lock();
            inner.total_cycles += 1;
            (inner.total_cycles, inner.config.clone())
        };
        let _ = self.events.send(LoopEvent::CycleComplete { cycle, summary });
        run_maintenance(&self.bank, cycle, &config_snapshot);
        summary
    }
}

impl Drop for CognitiveLoop {
    fn drop(&mut self) {
        if let Some(handle) = self.driver.lock().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{AttentionBank, BankConfig};
    use crate::store::AtomStore;

    fn fixture(max_cycles: u64) -> CognitiveLoop {
        let store = Arc::new(AtomStore::default());
        let bank = Arc::new(AttentionBank::new(store.clone(), BankConfig::default()));
        let orchestrator = Arc::new(Orchestrator::new(
            store,
            bank.clone(),
            super::super::orchestrator::OrchestratorConfig::default(),
        ));
        CognitiveLoop::new(
            orchestrator,
            bank,
            LoopConfig {
                cycle_interval: Duration::from_millis(1),
                max_cycles: Some(max_cycles),
                decay_interval: 2,
                normalize_interval: 3,
                ..Default::default()
            },
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn runs_to_completion_and_reports_max_cycles() {
        let cognitive_loop = fixture(5);
        let mut events = cognitive_loop.subscribe();
        cognitive_loop.start();

        let mut completed = 0;
        let mut saw_max = false;
        while let Ok(event) = tokio::time::timeout(Duration::from_secs(2), events.recv()).await.unwrap() {
            match event {
                LoopEvent::CycleComplete { .. } => completed += 1,
                LoopEvent::MaxCyclesReached { total_cycles } => {
                    assert_eq!(total_cycles, 5);
                    saw_max = true;
                    break;
                }
                _ => {}
            }
        }
        assert_eq!(completed, 5);
        assert!(saw_max);
        assert_eq!(cognitive_loop.stats().state, LoopState::Stopped);
    }
}
