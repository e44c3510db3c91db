//! Crate-wide error type.
//!
//! Per the error taxonomy: programming faults (bad handles, non-finite
//! numbers, non-positive counts) fail loudly at the API boundary. Intervals,
//! frequencies and caps are unsigned types at the config-struct level, so the
//! "negative interval" programming fault spec.md §7 names cannot arise in
//! this representation and has no dedicated variant. Agent errors and cycle
//! errors are *not* represented here — they are captured as data in
//! [`crate::agent::AgentOutcome`] and orchestrator/loop cycle summaries
//! instead, matching the teacher's pattern of capturing a fallible unit of
//! work into a result struct rather than bubbling it with `?`.

use thiserror::Error;

/// Errors raised at the public API boundary of the store, bank, orchestrator
/// and inference engine.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NoeticError {
    /// A handle was passed that does not belong to this store, or refers to
    /// an atom that has since been removed.
    #[error("unknown or stale atom handle: {0:?}")]
    InvalidHandle(crate::atom::AtomHandle),

    /// A truth value or importance component was NaN or infinite.
    #[error("non-finite value for {field}: {value}")]
    NonFiniteValue { field: &'static str, value: f64 },

    /// A strength/confidence/STI component fell outside its documented range.
    #[error("{field} out of range [{min}, {max}]: {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// `focus`/`patternMatch`/batch sizing received a non-positive count.
    #[error("invalid count for {field}: must be positive, got {value}")]
    InvalidCount { field: &'static str, value: i64 },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NoeticError>;
