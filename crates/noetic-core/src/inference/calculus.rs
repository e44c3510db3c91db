//! Probabilistic truth-value calculus, isolated as free functions so each
//! rule is unit-testable without an engine or a store.

use crate::atom::TruthValue;

/// Default independence assumption for [`conjunction`]/[`disjunction`].
pub const DEFAULT_INDEPENDENCE: f64 = 0.8;

fn build(strength: f64, confidence: f64) -> TruthValue {
    TruthValue::new_unchecked(strength.clamp(0.0, 1.0), confidence.clamp(0.0, 1.0))
}

/// `A→B, B→C ⊢ A→C`.
pub fn deduction(ab: TruthValue, bc: TruthValue) -> TruthValue {
    build(ab.strength() * bc.strength(), 0.9 * ab.confidence().min(bc.confidence()))
}

/// `A→B ⊢ B→A`, weighted by the prior probability of `B`.
pub fn induction(ab: TruthValue, prior_b: f64) -> TruthValue {
    build(ab.strength() * prior_b, 0.8 * ab.confidence())
}

/// `B→C, A→C ⊢ A→B`, weighted by the prior probability of `B`.
pub fn abduction(bc: TruthValue, ac: TruthValue, prior_b: f64) -> TruthValue {
    let strength = (bc.strength() * ac.strength() / prior_b.max(0.01)).min(1.0);
    build(strength, 0.7 * bc.confidence().min(ac.confidence()))
}

/// Combine two truth values for the same statement.
pub fn revision(tv1: TruthValue, tv2: TruthValue) -> TruthValue {
    let (s1, c1) = (tv1.strength(), tv1.confidence());
    let (s2, c2) = (tv2.strength(), tv2.confidence());
    let denom = c1 + c2;
    let strength = if denom == 0.0 { 0.5 } else { (s1 * c1 + s2 * c2) / denom };
    build(strength, denom)
}

/// `A ∧ B`, under an independence assumption.
pub fn conjunction(a: TruthValue, b: TruthValue, indep: f64) -> TruthValue {
    build(a.strength() * b.strength(), indep * a.confidence().min(b.confidence()))
}

/// `A ∨ B`, under an independence assumption.
pub fn disjunction(a: TruthValue, b: TruthValue, indep: f64) -> TruthValue {
    let sa = a.strength();
    let sb = b.strength();
    build(sa + sb - sa * sb, indep * a.confidence().min(b.confidence()))
}

/// `¬A`. Confidence is preserved; strength reflects.
pub fn negation(tv: TruthValue) -> TruthValue {
    build(1.0 - tv.strength(), tv.confidence())
}

/// `A, A→B ⊢ B`.
pub fn modus_ponens(a: TruthValue, ab: TruthValue) -> TruthValue {
    build(a.strength() * ab.strength(), 0.95 * a.confidence().min(ab.confidence()))
}
