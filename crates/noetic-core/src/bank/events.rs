//! Attention bank observability events.

use crate::atom::AtomHandle;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub enum BankEvent {
    /// `stimulate` applied `delta` (the actual, post-clamp delta) to `handle`.
    Stimulated { handle: AtomHandle, delta: f64 },
    /// `decaySTI` ran and removed a total of `removed` STI across all atoms.
    Decayed { removed: f64 },
    /// `normalizeSTI`/`normalizeLTI` ran and rescaled every atom's total.
    Normalized { component: &'static str },
    /// `spreadImportance` ran, redistributing STI from the current focus.
    Spread,
    /// `reset` zeroed every atom's STI and LTI.
    Reset,
}
