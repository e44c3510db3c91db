//! The atom store — arena-backed hypergraph storage with deduplication,
//! type/name indexing and attention-driven eviction.
//!
//! Mutable state lives behind a single `parking_lot::Mutex`, so `AtomStore`
//! is `Send + Sync` and shareable via `Arc<AtomStore>` without a second layer
//! of locking at call sites (mirrors the teacher's `Storage` pattern of
//! `&self` methods over an internally-locked state struct).

mod config;
mod events;

pub use config::{StoreConfig, StoreStats};
pub use events::{StoreEvent, EVENT_CHANNEL_CAPACITY};

use crate::atom::{AtomHandle, AtomRecord, AtomView, Importance, TruthValue};
use crate::error::{NoeticError, Result};
use chrono::Utc;
use lasso::{Spur, ThreadedRodeo};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::broadcast;
use tracing::{debug, info};

type DedupKey = (Spur, Option<String>, Vec<AtomHandle>);

struct Slot {
    record: Option<AtomRecord>,
    generation: u32,
}

struct StoreInner {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    interner: ThreadedRodeo,
    dedup_index: HashMap<DedupKey, AtomHandle>,
    type_index: HashMap<Spur, HashSet<AtomHandle>>,
    name_index: HashMap<String, HashSet<AtomHandle>>,
    live_count: usize,
}

impl StoreInner {
    fn get(&self, handle: AtomHandle) -> Option<&AtomRecord> {
        let slot = self.slots.get(handle.index())?;
        (slot.generation == handle.generation())
            .then(|| slot.record.as_ref())
            .flatten()
    }

    fn get_mut(&mut self, handle: AtomHandle) -> Option<&mut AtomRecord> {
        let gen = handle.generation();
        let slot = self.slots.get_mut(handle.index())?;
        (slot.generation == gen).then(|| slot.record.as_mut()).flatten()
    }

    fn take(&mut self, handle: AtomHandle) -> Option<AtomRecord> {
        let idx = handle.index();
        let gen = handle.generation();
        let slot = self.slots.get_mut(idx)?;
        if slot.generation != gen {
            return None;
        }
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(idx as u32);
        Some(record)
    }

    fn insert(&mut self, make: impl FnOnce(AtomHandle) -> AtomRecord) -> AtomHandle {
        if let Some(idx) = self.free_list.pop() {
            let gen = self.slots[idx as usize].generation;
            let handle = AtomHandle::new(idx, gen);
            self.slots[idx as usize].record = Some(make(handle));
            handle
        } else {
            let idx = self.slots.len() as u32;
            let handle = AtomHandle::new(idx, 0);
            self.slots.push(Slot {
                record: Some(make(handle)),
                generation: 0,
            });
            handle
        }
    }
}

/// Owns every atom in one hypergraph, enforcing the uniqueness and
/// incoming-set invariants and evicting under population pressure.
pub struct AtomStore {
    inner: Mutex<StoreInner>,
    config: StoreConfig,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for AtomStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl AtomStore {
    pub fn new(config: StoreConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(StoreInner {
                slots: Vec::new(),
                free_list: Vec::new(),
                interner: ThreadedRodeo::default(),
                dedup_index: HashMap::new(),
                type_index: HashMap::new(),
                name_index: HashMap::new(),
                live_count: 0,
            }),
            config,
            events,
        }
    }

    /// Subscribe to store events. Lagging subscribers drop the oldest
    /// undelivered event rather than stalling the store.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Insert an atom, or merge into its existing duplicate under invariant 1.
    ///
    /// Fails only if `outgoing` references a handle this store does not
    /// recognise.
    pub fn add(
        &self,
        type_tag: &str,
        name: Option<&str>,
        outgoing: Vec<AtomHandle>,
        tv: Option<TruthValue>,
    ) -> Result<AtomHandle> {
        let tv = tv.unwrap_or_default();
        let name_owned = name.map(str::to_string);
        let mut inner = self.inner.lock();

        for h in &outgoing {
            if inner.get(*h).is_none() {
                return Err(NoeticError::InvalidHandle(*h));
            }
        }

        let spur = inner.interner.get_or_intern(type_tag);
        let key: DedupKey = (spur, name_owned.clone(), outgoing.clone());

        if let Some(&existing) = inner.dedup_index.get(&key) {
            let record = inner
                .get_mut(existing)
                .expect("dedup index points at a live atom");
            let merged = TruthValue::new_unchecked(
                (record.truth_value.strength() + tv.strength()) / 2.0,
                record.truth_value.confidence().max(tv.confidence()),
            );
            record.truth_value = merged;
            record.updated_at = Utc::now();
            drop(inner);
            debug!(handle = %existing, "atom merged on duplicate insert");
            let _ = self.events.send(StoreEvent::AtomUpdated { handle: existing });
            return Ok(existing);
        }

        let now = Utc::now();
        let handle = inner.insert(|handle| AtomRecord {
            handle,
            type_tag: spur,
            name: name_owned.clone(),
            outgoing: outgoing.clone(),
            incoming: Vec::new(),
            truth_value: tv,
            importance: Importance::default(),
            created_at: now,
            updated_at: now,
            metadata: BTreeMap::new(),
        });

        for target in &outgoing {
            if let Some(target_record) = inner.get_mut(*target) {
                target_record.incoming.push(handle);
            }
        }

        inner.type_index.entry(spur).or_default().insert(handle);
        if let Some(name) = &name_owned {
            inner.name_index.entry(name.clone()).or_default().insert(handle);
        }
        inner.dedup_index.insert((spur, name_owned, outgoing), handle);
        inner.live_count += 1;

        drop(inner);
        debug!(%handle, type_tag, "atom added");
        let _ = self.events.send(StoreEvent::AtomAdded { handle });
        self.evict_if_needed(handle);
        Ok(handle)
    }

    pub fn get(&self, handle: AtomHandle) -> Option<AtomView> {
        let inner = self.inner.lock();
        inner.get(handle).map(|r| AtomView::from_record(r, &inner.interner))
    }

    /// Remove `handle`, cascading to every atom that references it in its
    /// outgoing sequence (invariant 3). Returns whether `handle` itself was
    /// live at the time of the call.
    pub fn remove(&self, handle: AtomHandle) -> bool {
        let dependents = {
            let inner = self.inner.lock();
            match inner.get(handle) {
                Some(r) => r.incoming.clone(),
                None => return false,
            }
        };
        for dep in dependents {
            self.remove(dep);
        }

        let mut inner = self.inner.lock();
        let record = match inner.take(handle) {
            Some(r) => r,
            None => return false,
        };
        for target in &record.outgoing {
            if let Some(target_record) = inner.get_mut(*target) {
                target_record.incoming.retain(|h| *h != handle);
            }
        }
        if let Some(set) = inner.type_index.get_mut(&record.type_tag) {
            set.remove(&handle);
        }
        if let Some(name) = &record.name {
            if let Some(set) = inner.name_index.get_mut(name) {
                set.remove(&handle);
            }
        }
        inner
            .dedup_index
            .remove(&(record.type_tag, record.name.clone(), record.outgoing.clone()));
        inner.live_count -= 1;
        drop(inner);

        debug!(%handle, "atom removed");
        let _ = self.events.send(StoreEvent::AtomRemoved { handle });
        true
    }

    pub fn by_type(&self, type_tag: &str) -> Vec<AtomHandle> {
        let inner = self.inner.lock();
        match inner.interner.get(type_tag) {
            Some(spur) => inner
                .type_index
                .get(&spur)
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn by_name(&self, name: &str) -> Vec<AtomHandle> {
        let inner = self.inner.lock();
        inner
            .name_index
            .get(name)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn all(&self) -> Vec<AtomHandle> {
        let inner = self.inner.lock();
        inner
            .slots
            .iter()
            .filter_map(|s| s.record.as_ref())
            .map(|r| r.handle)
            .collect()
    }

    /// Up to `k` handles ordered by descending STI.
    pub fn focus(&self, k: usize) -> Result<Vec<AtomHandle>> {
        if k == 0 {
            return Err(NoeticError::InvalidCount {
                field: "focus.k",
                value: 0,
            });
        }
        let inner = self.inner.lock();
        let mut ranked: Vec<(AtomHandle, f64)> = inner
            .slots
            .iter()
            .filter_map(|s| s.record.as_ref())
            .map(|r| (r.handle, r.importance.sti))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked.into_iter().map(|(h, _)| h).collect())
    }

    pub fn pattern_match(&self, pattern: &crate::query::PatternQuery) -> Vec<AtomHandle> {
        let inner = self.inner.lock();
        inner
            .slots
            .iter()
            .filter_map(|s| s.record.as_ref())
            .filter(|r| pattern.matches(&AtomView::from_record(r, &inner.interner)))
            .map(|r| r.handle)
            .collect()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.slots.clear();
        inner.free_list.clear();
        inner.dedup_index.clear();
        inner.type_index.clear();
        inner.name_index.clear();
        inner.live_count = 0;
        drop(inner);
        info!("store cleared");
        let _ = self.events.send(StoreEvent::Cleared);
    }

    pub fn size(&self) -> usize {
        self.inner.lock().live_count
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock();
        let mut type_counts: HashMap<String, usize> = HashMap::new();
        let mut node_count = 0;
        let mut link_count = 0;
        let mut oldest = None;
        let mut newest = None;
        for record in inner.slots.iter().filter_map(|s| s.record.as_ref()) {
            if record.is_node() {
                node_count += 1;
            } else {
                link_count += 1;
            }
            *type_counts
                .entry(inner.interner.resolve(&record.type_tag).to_string())
                .or_insert(0) += 1;
            oldest = Some(oldest.map_or(record.created_at, |o: chrono::DateTime<Utc>| o.min(record.created_at)));
            newest = Some(newest.map_or(record.created_at, |n: chrono::DateTime<Utc>| n.max(record.created_at)));
        }
        StoreStats {
            atom_count: inner.live_count,
            node_count,
            link_count,
            type_counts,
            oldest_created_at: oldest,
            newest_created_at: newest,
        }
    }

    pub fn metadata_get(&self, handle: AtomHandle, key: &str) -> Option<serde_json::Value> {
        let inner = self.inner.lock();
        inner.get(handle).and_then(|r| r.metadata.get(key).cloned())
    }

    pub fn metadata_set(&self, handle: AtomHandle, key: &str, value: serde_json::Value) -> Result<()> {
        let mut inner = self.inner.lock();
        let record = inner.get_mut(handle).ok_or(NoeticError::InvalidHandle(handle))?;
        record.metadata.insert(key.to_string(), value);
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Lowest-10%-of-total-population eviction, skipping VLTI atoms. Runs at
    /// most once per `add` call, per the population check after insertion.
    ///
    /// `just_added` is exempt from this call's candidate set: a brand-new
    /// atom always carries the default `Importance` (`sti = 0.0`) until a
    /// caller stimulates it through the bank, which happens strictly after
    /// `add` returns. Without this exemption the atom that *triggered* the
    /// threshold crossing would also always be its own lowest-STI victim,
    /// evicting exactly what was just inserted instead of the store's
    /// actually-stale entries.
    ///
    /// If more than 90% of atoms are VLTI-protected the store can
    /// permanently exceed `max_size`; this is inherited, documented
    /// behaviour rather than a bug (see `DESIGN.md`).
    fn evict_if_needed(&self, just_added: AtomHandle) {
        if !self.config.forgetting_enabled {
            return;
        }
        let victims = {
            let inner = self.inner.lock();
            if inner.live_count <= self.config.max_size {
                return;
            }
            let total = inner.live_count;
            let n = ((total as f64) * 0.1).ceil() as usize;
            let mut candidates: Vec<(AtomHandle, f64)> = inner
                .slots
                .iter()
                .filter_map(|s| s.record.as_ref())
                .filter(|r| !r.importance.vlti && r.handle != just_added)
                .map(|r| (r.handle, r.importance.sti))
                .collect();
            candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
            candidates.truncate(n);
            candidates.into_iter().map(|(h, _)| h).collect::<Vec<_>>()
        };

        let mut removed = 0;
        for handle in victims {
            if self.remove(handle) {
                removed += 1;
            }
        }
        if removed > 0 {
            info!(count = removed, "eviction ran");
            let _ = self.events.send(StoreEvent::Forgotten { count: removed });
        }
    }

    // --- Gateway accessors for the attention bank and inference engine. All
    // importance and truth-value writes go through here; nothing outside
    // this crate can reach AtomRecord directly.

    pub(crate) fn importance_of(&self, handle: AtomHandle) -> Result<Importance> {
        let inner = self.inner.lock();
        inner.get(handle).map(|r| r.importance).ok_or(NoeticError::InvalidHandle(handle))
    }

    pub(crate) fn write_importance(&self, handle: AtomHandle, importance: Importance) -> Result<()> {
        let mut inner = self.inner.lock();
        let record = inner.get_mut(handle).ok_or(NoeticError::InvalidHandle(handle))?;
        record.importance = importance;
        record.updated_at = Utc::now();
        Ok(())
    }

    pub(crate) fn outgoing_of(&self, handle: AtomHandle) -> Result<Vec<AtomHandle>> {
        let inner = self.inner.lock();
        inner.get(handle).map(|r| r.outgoing.clone()).ok_or(NoeticError::InvalidHandle(handle))
    }

    pub(crate) fn incoming_of(&self, handle: AtomHandle) -> Result<Vec<AtomHandle>> {
        let inner = self.inner.lock();
        inner.get(handle).map(|r| r.incoming.clone()).ok_or(NoeticError::InvalidHandle(handle))
    }

    pub(crate) fn all_importances(&self) -> Vec<(AtomHandle, Importance)> {
        let inner = self.inner.lock();
        inner
            .slots
            .iter()
            .filter_map(|s| s.record.as_ref())
            .map(|r| (r.handle, r.importance))
            .collect()
    }

    /// Overwrite `handle`'s truth value directly, bypassing `add`'s
    /// average-on-duplicate merge. Used by forward chaining to strengthen an
    /// existing implication in place.
    pub(crate) fn set_truth_value(&self, handle: AtomHandle, tv: TruthValue) -> Result<()> {
        let mut inner = self.inner.lock();
        let record = inner.get_mut(handle).ok_or(NoeticError::InvalidHandle(handle))?;
        record.truth_value = tv;
        record.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::builtin_tags::{CONCEPT, INHERITANCE};

    #[test]
    fn deduplication_merges_truth_values() {
        let store = AtomStore::default();
        let a = store
            .add(CONCEPT, Some("cat"), vec![], Some(TruthValue::new(0.8, 0.9).unwrap()))
            .unwrap();
        let b = store
            .add(CONCEPT, Some("cat"), vec![], Some(TruthValue::new(0.4, 0.5).unwrap()))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(store.size(), 1);
        let view = store.get(a).unwrap();
        assert!((view.truth_value.strength() - 0.6).abs() < 1e-9);
        assert!((view.truth_value.confidence() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn incoming_set_tracks_links_and_cascade_removal() {
        let store = AtomStore::default();
        let a = store.add(CONCEPT, Some("cat"), vec![], None).unwrap();
        let b = store.add(CONCEPT, Some("animal"), vec![], None).unwrap();
        let l = store
            .add(INHERITANCE, Some("l"), vec![a, b], None)
            .unwrap();

        assert_eq!(store.get(a).unwrap().incoming, vec![l]);
        assert_eq!(store.get(b).unwrap().incoming, vec![l]);

        assert!(store.remove(l));
        assert!(store.get(a).unwrap().incoming.is_empty());
        assert!(store.get(b).unwrap().incoming.is_empty());
        assert!(store.get(a).is_some());
        assert!(store.get(b).is_some());
    }

    #[test]
    fn eviction_respects_vlti_and_targets_total_population() {
        let store = AtomStore::new(StoreConfig {
            max_size: 5,
            forgetting_enabled: true,
        });
        let mut handles = Vec::new();
        for sti in 0..10 {
            let h = store.add(CONCEPT, Some(&format!("n{sti}")), vec![], None).unwrap();
            store
                .write_importance(
                    h,
                    Importance {
                        sti: sti as f64,
                        lti: 0.0,
                        vlti: sti == 0,
                    },
                )
                .unwrap();
            handles.push(h);
        }
        assert_eq!(store.size(), 5);
        assert!(store.get(handles[0]).is_some(), "VLTI atom must survive eviction");
    }

    #[test]
    fn add_rejects_unknown_outgoing_handle() {
        let store = AtomStore::default();
        let stray = AtomHandle::new(99, 0);
        let err = store.add(CONCEPT, None, vec![stray], None).unwrap_err();
        assert!(matches!(err, NoeticError::InvalidHandle(_)));
    }
}
