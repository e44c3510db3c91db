//! Atom — the sole primitive of the hypergraph store.
//!
//! An atom is a node if its outgoing sequence is empty, or a link otherwise.
//! Callers never construct [`Atom`] directly; it is only ever produced by
//! [`crate::store::AtomStore::add`] and observed through [`AtomView`], an
//! owned snapshot that is safe to hold across further store mutations.

mod handle;
mod truth_value;

pub use handle::AtomHandle;
pub use truth_value::TruthValue;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Short-term importance floor used when a store has not overridden
/// [`crate::bank::BankConfig::sti_min`].
pub const DEFAULT_STI_MIN: f64 = -1000.0;

/// Short-term importance ceiling used when a store has not overridden
/// [`crate::bank::BankConfig::sti_max`].
pub const DEFAULT_STI_MAX: f64 = 1000.0;

/// A handful of built-in type tags every fresh store recognises out of the
/// box. The tag set is otherwise open: callers may `add` atoms under any
/// tag string and it is interned and indexed the same way.
pub mod builtin_tags {
    /// A concept node — the default tag for untyped knowledge.
    pub const CONCEPT: &str = "CONCEPT";
    /// A predicate node (a named relation, used as the head of an
    /// [`EVALUATION`] link).
    pub const PREDICATE: &str = "PREDICATE";
    /// A variable node, used in pattern templates.
    pub const VARIABLE: &str = "VARIABLE";
    /// The generic untyped link tag.
    pub const LINK: &str = "LINK";
    /// `A INHERITANCE B` — A is-a B.
    pub const INHERITANCE: &str = "INHERITANCE";
    /// `A SIMILARITY B` — a symmetric likeness relation.
    pub const SIMILARITY: &str = "SIMILARITY";
    /// `PREDICATE(args...)` applied to concrete arguments.
    pub const EVALUATION: &str = "EVALUATION";
    /// A schema/procedure application.
    pub const EXECUTION: &str = "EXECUTION";
    /// `A IMPLICATION B` — A probabilistically implies B; the statement
    /// type the inference engine chains over.
    pub const IMPLICATION: &str = "IMPLICATION";
}

/// The importance triple carried by every atom.
///
/// `sti` (short-term importance) is clamped to a configured range at every
/// write; `lti` (long-term importance) is unbounded-but-non-negative; `vlti`
/// ("very long-term important") excludes the atom from eviction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Importance {
    /// Short-term importance. Clamped to `[sti_min, sti_max]`.
    pub sti: f64,
    /// Long-term importance. Never negative.
    pub lti: f64,
    /// Protection flag: if set, eviction never removes this atom.
    pub vlti: bool,
}

impl Default for Importance {
    fn default() -> Self {
        Self {
            sti: 0.0,
            lti: 0.0,
            vlti: false,
        }
    }
}

/// The internal, store-owned representation of an atom.
///
/// Never exposed to callers directly — [`AtomView`] is the read-only
/// snapshot type returned by the store's accessors.
#[derive(Debug, Clone)]
pub(crate) struct AtomRecord {
    pub handle: AtomHandle,
    pub type_tag: lasso::Spur,
    pub name: Option<String>,
    pub outgoing: Vec<AtomHandle>,
    pub incoming: Vec<AtomHandle>,
    pub truth_value: TruthValue,
    pub importance: Importance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl AtomRecord {
    pub fn is_node(&self) -> bool {
        self.outgoing.is_empty()
    }
}

/// An owned, point-in-time snapshot of an atom.
///
/// Returned by every store read operation. Holding an `AtomView` after
/// further mutation of the store is safe (it never borrows into the store)
/// but it will not reflect subsequent changes — call the store again to
/// refresh.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomView {
    /// Stable identity, unique for the lifetime of the store.
    pub handle: AtomHandle,
    /// The type tag, e.g. `"CONCEPT"` or `"INHERITANCE"`.
    pub type_tag: String,
    /// Optional display name, used for human identification and dedup keying.
    pub name: Option<String>,
    /// Ordered outgoing sequence. Empty for a node, non-empty for a link.
    pub outgoing: Vec<AtomHandle>,
    /// Every atom whose outgoing sequence contains this atom.
    pub incoming: Vec<AtomHandle>,
    /// `(strength, confidence)`.
    pub truth_value: TruthValue,
    /// `(sti, lti, vlti)`.
    pub importance: Importance,
    /// When the atom was first added.
    pub created_at: DateTime<Utc>,
    /// When the atom was last touched (merge, importance write, metadata write).
    pub updated_at: DateTime<Utc>,
    /// Opaque, caller-defined metadata.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl AtomView {
    /// A node is an atom with an empty outgoing sequence.
    pub fn is_node(&self) -> bool {
        self.outgoing.is_empty()
    }

    /// A link is an atom with a non-empty outgoing sequence.
    pub fn is_link(&self) -> bool {
        !self.outgoing.is_empty()
    }
}

impl AtomView {
    /// Build a snapshot from an internal record, resolving its interned
    /// type tag through the store's string table.
    pub(crate) fn from_record(r: &AtomRecord, resolver: &lasso::ThreadedRodeo) -> Self {
        Self {
            handle: r.handle,
            type_tag: resolver.resolve(&r.type_tag).to_string(),
            name: r.name.clone(),
            outgoing: r.outgoing.clone(),
            incoming: r.incoming.clone(),
            truth_value: r.truth_value,
            importance: r.importance,
            created_at: r.created_at,
            updated_at: r.updated_at,
            metadata: r.metadata.clone(),
        }
    }
}
