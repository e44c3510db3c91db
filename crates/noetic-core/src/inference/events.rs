//! Inference engine observability events.

use crate::atom::AtomHandle;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub enum InferenceEvent {
    /// A fresh implication atom was inserted by forward chaining.
    DeductionNew {
        handle: AtomHandle,
        strength: f64,
        confidence: f64,
    },
    /// An existing implication atom's truth value was overwritten with a
    /// strictly more confident one.
    DeductionUpdate {
        handle: AtomHandle,
        strength: f64,
        confidence: f64,
    },
}
