//! Pure attention-economy math, isolated from `AttentionBank` so each rule is
//! unit-testable without a store.

/// Clamp `sti` into `[min, max]`.
pub fn clamp_sti(sti: f64, min: f64, max: f64) -> f64 {
    sti.clamp(min, max)
}

/// STI retained after one decay call: `sti - sti * (1 - decay_rate)`,
/// floored at zero. Returns `(new_sti, amount_removed)`.
pub fn decay(sti: f64, decay_rate: f64) -> (f64, f64) {
    if sti <= 0.0 {
        return (sti, 0.0);
    }
    let removed = sti * (1.0 - decay_rate);
    let new_sti = (sti - removed).max(0.0);
    (new_sti, sti - new_sti)
}

/// Scale factor that brings `total` to `target`. `None` if `total` is
/// already at target or is zero (normalisation is then a documented no-op).
pub fn normalize_scale(total: f64, target: f64) -> Option<f64> {
    if total == 0.0 || (total - target).abs() < f64::EPSILON {
        None
    } else {
        Some(target / total)
    }
}

/// The STI amount `spreadImportance` pushes from a focus atom to each
/// neighbour: the source's own share times the diffusion factor. Incoming
/// neighbours receive half this amount; see spec §4.2.
pub fn spread_amount(source_sti: f64, diffusion: f64) -> f64 {
    source_sti * diffusion
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_never_goes_negative() {
        let (new_sti, removed) = decay(1.0, 0.0);
        assert_eq!(new_sti, 0.0);
        assert_eq!(removed, 1.0);
    }

    #[test]
    fn decay_is_noop_below_zero() {
        let (new_sti, removed) = decay(-5.0, 0.5);
        assert_eq!(new_sti, -5.0);
        assert_eq!(removed, 0.0);
    }

    #[test]
    fn normalize_scale_is_none_at_target() {
        assert_eq!(normalize_scale(1000.0, 1000.0), None);
    }

    #[test]
    fn normalize_scale_is_none_at_zero_total() {
        assert_eq!(normalize_scale(0.0, 1000.0), None);
    }

    #[test]
    fn normalize_scale_computes_ratio() {
        assert_eq!(normalize_scale(100.0, 1000.0), Some(10.0));
    }
}
