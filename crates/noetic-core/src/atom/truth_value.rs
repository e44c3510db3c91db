//! Probabilistic truth value: `(strength, confidence)`.

use crate::error::{NoeticError, Result};
use serde::{Deserialize, Serialize};

/// A probabilistic truth value in the simple strength/confidence model.
///
/// `strength` is the estimated probability of the statement, in `[0, 1]`.
/// `confidence` is how much evidence backs that estimate, in `[0, 1]`,
/// where `0` means "no evidence" and `1` means "maximal evidence" (the
/// model never reaches full certainty in practice; callers that want a
/// fixed, unrevisable fact should still pick a high-but-not-exactly-1
/// confidence).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruthValue {
    strength: f64,
    confidence: f64,
}

/// Neutral prior assigned to atoms created without an explicit truth value:
/// maximal uncertainty, zero evidence.
pub const DEFAULT_TRUTH_VALUE: TruthValue = TruthValue {
    strength: 0.5,
    confidence: 0.0,
};

impl Default for TruthValue {
    fn default() -> Self {
        DEFAULT_TRUTH_VALUE
    }
}

impl TruthValue {
    /// Construct a truth value, validating both components lie in `[0, 1]`
    /// and are finite.
    pub fn new(strength: f64, confidence: f64) -> Result<Self> {
        check_unit_range("strength", strength)?;
        check_unit_range("confidence", confidence)?;
        Ok(Self {
            strength,
            confidence,
        })
    }

    /// Construct a truth value without validating its components. Used
    /// internally by calculus operators whose outputs are already proven to
    /// lie in range.
    pub(crate) fn new_unchecked(strength: f64, confidence: f64) -> Self {
        Self {
            strength,
            confidence,
        }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

fn check_unit_range(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(NoeticError::NonFiniteValue { field, value });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(NoeticError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}
