//! Inference engine configuration and diagnostics.

/// Configuration accepted by [`super::InferenceEngine::new`].
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Default `maxIterations` used by the agent's own `tick`.
    pub inference_depth: usize,
    /// Minimum confidence a premise or a produced truth value must meet.
    pub min_confidence: f64,
    /// Minimum strength a produced truth value must meet.
    pub min_strength: f64,
    /// Hard cap on inferences performed across one `forwardChain` call.
    pub max_inferences: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            inference_depth: 3,
            min_confidence: 0.1,
            min_strength: 0.01,
            max_inferences: 100,
        }
    }
}

/// Read-only snapshot of the engine's lifetime counters.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceStats {
    pub inferences_performed: usize,
}
