//! Inference engine — a distinguished agent encoding a probabilistic
//! calculus over typed implication links.

pub mod calculus;
mod config;
mod events;

pub use config::{InferenceConfig, InferenceStats};
pub use events::InferenceEvent;

use crate::agent::Agent;
use crate::atom::{builtin_tags, AtomHandle, TruthValue};
use crate::bank::AttentionBank;
use crate::query::PatternQuery;
use crate::store::{AtomStore, EVENT_CHANNEL_CAPACITY};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;

/// Result of one [`InferenceEngine::forward_chain`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardChainReport {
    pub iterations: usize,
    pub inferences_performed: usize,
}

/// Forward-chains deduction over `IMPLICATION` links, writing new or
/// stronger links back into its store.
pub struct InferenceEngine {
    store: Arc<AtomStore>,
    config: InferenceConfig,
    events: broadcast::Sender<InferenceEvent>,
    inferences_performed: AtomicUsize,
}

impl InferenceEngine {
    pub fn new(store: Arc<AtomStore>, config: InferenceConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            config,
            events,
            inferences_performed: AtomicUsize::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InferenceEvent> {
        self.events.subscribe()
    }

    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            inferences_performed: self.inferences_performed.load(Ordering::Relaxed),
        }
    }

    fn find_implication(&self, from: AtomHandle, to: AtomHandle) -> Option<AtomHandle> {
        self.store
            .by_type(builtin_tags::IMPLICATION)
            .into_iter()
            .find(|h| {
                self.store
                    .get(*h)
                    .map(|view| view.outgoing == [from, to])
                    .unwrap_or(false)
            })
    }

    /// Loop deduction over ordered pairs of implication links sharing a
    /// middle term, up to `max_iterations` or until a step is unproductive
    /// or `maxInferences` is reached.
    ///
    /// Ill-formed premises (wrong arity, missing truth value) are silently
    /// skipped; the engine never removes atoms; produced truth values are
    /// clamped into `[0, 1]` by [`calculus::deduction`] itself.
    pub fn forward_chain(&self, max_iterations: usize) -> ForwardChainReport {
        let mut iterations_run = 0;

        for _ in 0..max_iterations {
            iterations_run += 1;
            if self.inferences_performed.load(Ordering::Relaxed) >= self.config.max_inferences {
                break;
            }

            let links: Vec<(AtomHandle, AtomHandle, AtomHandle, TruthValue)> = self
                .store
                .by_type(builtin_tags::IMPLICATION)
                .into_iter()
                .filter_map(|h| {
                    let view = self.store.get(h)?;
                    if view.outgoing.len() != 2 {
                        return None;
                    }
                    Some((h, view.outgoing[0], view.outgoing[1], view.truth_value))
                })
                .collect();

            let mut produced_any = false;

            'pairs: for &(h1, a, b1, tv1) in &links {
                for &(h2, b2, c, tv2) in &links {
                    if h1 == h2 || b1 != b2 {
                        continue;
                    }
                    if tv1.confidence() < self.config.min_confidence || tv2.confidence() < self.config.min_confidence {
                        continue;
                    }
                    let result = calculus::deduction(tv1, tv2);
                    if result.strength() < self.config.min_strength || result.confidence() < self.config.min_confidence {
                        continue;
                    }

                    match self.find_implication(a, c) {
                        None => {
                            if let Ok(handle) = self.store.add(builtin_tags::IMPLICATION, None, vec![a, c], Some(result)) {
                                produced_any = true;
                                self.inferences_performed.fetch_add(1, Ordering::Relaxed);
                                debug!(%handle, "deduction produced a new implication");
                                let _ = self.events.send(InferenceEvent::DeductionNew {
                                    handle,
                                    strength: result.strength(),
                                    confidence: result.confidence(),
                                });
                            }
                        }
                        Some(existing) => {
                            if let Some(existing_view) = self.store.get(existing) {
                                if existing_view.truth_value.confidence() < result.confidence()
                                    && self.store.set_truth_value(existing, result).is_ok()
                                {
                                    produced_any = true;
                                    self.inferences_performed.fetch_add(1, Ordering::Relaxed);
                                    debug!(%existing, "deduction strengthened an existing implication");
                                    let _ = self.events.send(InferenceEvent::DeductionUpdate {
                                        handle: existing,
                                        strength: result.strength(),
                                        confidence: result.confidence(),
                                    });
                                }
                            }
                        }
                    }

                    if self.inferences_performed.load(Ordering::Relaxed) >= self.config.max_inferences {
                        break 'pairs;
                    }
                }
            }

            if !produced_any {
                break;
            }
        }

        ForwardChainReport {
            iterations: iterations_run,
            inferences_performed: self.inferences_performed.load(Ordering::Relaxed),
        }
    }

    /// Collect every atom matching `pattern` and combine their truth values
    /// left-to-right by the revision rule; `(0, 0)` if nothing matches.
    pub fn query(&self, pattern: &PatternQuery) -> TruthValue {
        let mut acc: Option<TruthValue> = None;
        for handle in self.store.pattern_match(pattern) {
            if let Some(view) = self.store.get(handle) {
                acc = Some(match acc {
                    None => view.truth_value,
                    Some(prev) => calculus::revision(prev, view.truth_value),
                });
            }
        }
        acc.unwrap_or_else(|| TruthValue::new_unchecked(0.0, 0.0))
    }
}

#[async_trait]
impl Agent for InferenceEngine {
    fn name(&self) -> &str {
        "inference"
    }

    async fn tick(&self, _store: &Arc<AtomStore>, _bank: &Arc<AttentionBank>) -> Result<String, String> {
        let report = self.forward_chain(self.config.inference_depth);
        Ok(format!(
            "forward chain: {} iterations, {} inferences",
            report.iterations, report.inferences_performed
        ))
    }
}
