//! Store configuration and read-only diagnostics.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Configuration accepted by [`super::AtomStore::new`].
///
/// All fields are defaulted; see spec §6.3 for the option table this
/// mirrors.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Upper bound on live atoms before eviction runs.
    pub max_size: usize,
    /// Toggles eviction entirely. When `false`, the store grows without bound.
    pub forgetting_enabled: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_size: 10_000,
            forgetting_enabled: true,
        }
    }
}

/// Read-only snapshot of store-wide counters, analogous to a memory-stats
/// view: cheap to compute, safe to hold past further mutation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStats {
    /// Total live atoms (nodes + links).
    pub atom_count: usize,
    /// Live atoms with an empty outgoing sequence.
    pub node_count: usize,
    /// Live atoms with a non-empty outgoing sequence.
    pub link_count: usize,
    /// Live atom count per type tag.
    pub type_counts: HashMap<String, usize>,
    /// Creation timestamp of the oldest live atom, if any.
    pub oldest_created_at: Option<DateTime<Utc>>,
    /// Creation timestamp of the newest live atom, if any.
    pub newest_created_at: Option<DateTime<Utc>>,
}
