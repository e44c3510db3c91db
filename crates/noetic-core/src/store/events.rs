//! Store observability events.
//!
//! Broadcast on a dedicated channel (see [`super::AtomStore::subscribe`]).
//! Every variant is an owned snapshot; none borrow into the store, so a
//! subscriber may hold or process an event arbitrarily long after further
//! mutation.

use crate::atom::AtomHandle;
use serde::Serialize;

/// Default broadcast channel capacity for every event channel in this crate.
/// A lagging subscriber drops the oldest undelivered events rather than
/// blocking the emitter.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Events emitted by [`super::AtomStore`].
#[derive(Debug, Clone, Serialize)]
pub enum StoreEvent {
    /// A brand-new atom was inserted (no existing `(type, name, outgoing)` match).
    AtomAdded { handle: AtomHandle },
    /// An insert collided with an existing atom; its truth value was merged.
    AtomUpdated { handle: AtomHandle },
    /// An atom was removed, either explicitly or via cascade/eviction.
    AtomRemoved { handle: AtomHandle },
    /// Eviction ran and removed `count` atoms in this episode.
    Forgotten { count: usize },
    /// `clear()` dropped every atom.
    Cleared,
}
