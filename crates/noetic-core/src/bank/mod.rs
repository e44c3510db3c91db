//! The attention bank — short-term/long-term/very-long-term importance
//! accounting for one [`AtomStore`].
//!
//! All mutation of importance fields passes through here; the store's own
//! setters are crate-private gateways the bank is the sole caller of (spec
//! §5's "shared-resource policy").

mod config;
mod events;
pub mod formulas;

pub use config::{BankConfig, BankStats};
pub use events::BankEvent;

use crate::atom::AtomHandle;
use crate::error::Result;
use crate::store::{AtomStore, EVENT_CHANNEL_CAPACITY};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

struct Totals {
    sti: f64,
    lti: f64,
}

/// Owns importance accounting for one store. Cheaply `Arc`-shareable.
pub struct AttentionBank {
    store: Arc<AtomStore>,
    config: BankConfig,
    totals: Mutex<Totals>,
    events: broadcast::Sender<BankEvent>,
}

impl AttentionBank {
    pub fn new(store: Arc<AtomStore>, config: BankConfig) -> Self {
        let (sti, lti) = store
            .all_importances()
            .into_iter()
            .fold((0.0, 0.0), |(sti, lti), (_, imp)| (sti + imp.sti, lti + imp.lti));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            config,
            totals: Mutex::new(Totals { sti, lti }),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BankEvent> {
        self.events.subscribe()
    }

    /// Add `delta` to `handle`'s STI, clamped to `[sti_min, sti_max]`, and
    /// update the running total by the actually-applied delta.
    pub fn stimulate(&self, handle: AtomHandle, delta: f64) -> Result<()> {
        let mut imp = self.store.importance_of(handle)?;
        let old = imp.sti;
        imp.sti = formulas::clamp_sti(old + delta, self.config.sti_min, self.config.sti_max);
        let applied = imp.sti - old;
        self.store.write_importance(handle, imp)?;
        self.totals.lock().sti += applied;
        debug!(%handle, delta = applied, "stimulated");
        let _ = self.events.send(BankEvent::Stimulated { handle, delta: applied });
        Ok(())
    }

    pub fn set_lti(&self, handle: AtomHandle, value: f64) -> Result<()> {
        let mut imp = self.store.importance_of(handle)?;
        let delta = value - imp.lti;
        imp.lti = value;
        self.store.write_importance(handle, imp)?;
        self.totals.lock().lti += delta;
        Ok(())
    }

    pub fn set_vlti(&self, handle: AtomHandle, value: bool) -> Result<()> {
        let mut imp = self.store.importance_of(handle)?;
        imp.vlti = value;
        self.store.write_importance(handle, imp)
    }

    /// For every atom with `sti > 0`, subtract `sti * (1 - decayRate)`,
    /// clamped at zero. No-op if `rentEnabled` is false.
    pub fn decay_sti(&self) {
        if !self.config.rent_enabled {
            return;
        }
        let mut removed_total = 0.0;
        for (handle, mut imp) in self.store.all_importances() {
            if imp.sti <= 0.0 {
                continue;
            }
            let (new_sti, removed) = formulas::decay(imp.sti, self.config.decay_rate);
            if removed == 0.0 {
                continue;
            }
            imp.sti = new_sti;
            if self.store.write_importance(handle, imp).is_ok() {
                removed_total += removed;
            }
        }
        if removed_total > 0.0 {
            self.totals.lock().sti -= removed_total;
            debug!(removed = removed_total, "decaySTI applied");
            let _ = self.events.send(BankEvent::Decayed { removed: removed_total });
        }
    }

    /// If the global STI total differs from `targetSTI` and is non-zero,
    /// scale every atom's STI so the total becomes `targetSTI`.
    ///
    /// The post-scale STI is still clamped to `[sti_min, sti_max]`, so the
    /// realised total can fall short of `targetSTI` when clamping bites; the
    /// running total is re-derived from the actually-written values rather
    /// than assumed, so it never drifts from the sum of individual STIs.
    pub fn normalize_sti(&self) {
        let total = self.totals.lock().sti;
        let Some(scale) = formulas::normalize_scale(total, self.config.target_sti) else {
            return;
        };
        let mut realised_total = 0.0;
        for (handle, mut imp) in self.store.all_importances() {
            imp.sti = formulas::clamp_sti(imp.sti * scale, self.config.sti_min, self.config.sti_max);
            realised_total += imp.sti;
            let _ = self.store.write_importance(handle, imp);
        }
        self.totals.lock().sti = realised_total;
        info!(target = self.config.target_sti, realised = realised_total, "normalizeSTI applied");
        let _ = self.events.send(BankEvent::Normalized { component: "sti" });
    }

    /// Same as [`Self::normalize_sti`] but for LTI; LTI is never clamped, so
    /// the realised total always equals `targetLTI` exactly (up to
    /// floating-point rounding).
    pub fn normalize_lti(&self) {
        let total = self.totals.lock().lti;
        let Some(scale) = formulas::normalize_scale(total, self.config.target_lti) else {
            return;
        };
        let mut realised_total = 0.0;
        for (handle, mut imp) in self.store.all_importances() {
            imp.lti *= scale;
            realised_total += imp.lti;
            let _ = self.store.write_importance(handle, imp);
        }
        self.totals.lock().lti = realised_total;
        info!(target = self.config.target_lti, realised = realised_total, "normalizeLTI applied");
        let _ = self.events.send(BankEvent::Normalized { component: "lti" });
    }

    /// For each of the top-`focusSize` atoms by STI, push `sti * diffusion`
    /// to every outgoing neighbour and half that to every incoming
    /// neighbour. Never decreases the source atom's own STI.
    pub fn spread_importance(&self, diffusion: f64) -> Result<()> {
        let focus = self.store.focus(self.config.focus_size)?;
        let mut deltas: HashMap<AtomHandle, f64> = HashMap::new();
        for handle in &focus {
            let imp = self.store.importance_of(*handle)?;
            let amount = formulas::spread_amount(imp.sti, diffusion);
            if amount == 0.0 {
                continue;
            }
            for out in self.store.outgoing_of(*handle)? {
                *deltas.entry(out).or_insert(0.0) += amount;
            }
            for inc in self.store.incoming_of(*handle)? {
                *deltas.entry(inc).or_insert(0.0) += amount / 2.0;
            }
        }
        let mut applied_total = 0.0;
        for (handle, amount) in deltas {
            if let Ok(mut imp) = self.store.importance_of(handle) {
                let old = imp.sti;
                imp.sti = formulas::clamp_sti(old + amount, self.config.sti_min, self.config.sti_max);
                applied_total += imp.sti - old;
                let _ = self.store.write_importance(handle, imp);
            }
        }
        if applied_total != 0.0 {
            self.totals.lock().sti += applied_total;
        }
        let _ = self.events.send(BankEvent::Spread);
        Ok(())
    }

    /// Delegates to the store's `focus`.
    pub fn focus(&self, k: usize) -> Result<Vec<AtomHandle>> {
        self.store.focus(k)
    }

    pub fn stats(&self) -> BankStats {
        let totals = self.totals.lock();
        let atom_count = self.store.size();
        BankStats {
            total_sti: totals.sti,
            total_lti: totals.lti,
            atom_count,
            average_sti: if atom_count == 0 { 0.0 } else { totals.sti / atom_count as f64 },
            focus_size: self.config.focus_size,
        }
    }

    /// Zero every atom's STI and LTI (VLTI untouched) and reset running totals.
    pub fn reset(&self) {
        for (handle, mut imp) in self.store.all_importances() {
            imp.sti = 0.0;
            imp.lti = 0.0;
            let _ = self.store.write_importance(handle, imp);
        }
        let mut totals = self.totals.lock();
        totals.sti = 0.0;
        totals.lti = 0.0;
        drop(totals);
        info!("bank reset");
        let _ = self.events.send(BankEvent::Reset);
    }
}
