//! Generational handle identifying an atom within a single [`crate::store::AtomStore`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable reference to an atom slot in the store's arena.
///
/// Mirrors the generational-index pattern: `index` locates the slot,
/// `generation` distinguishes a live atom from a removed one that used to
/// occupy the same slot. A handle obtained before a `remove` compares unequal
/// to whatever later occupies that slot, so stale handles are detected
/// rather than silently aliased.
///
/// `AtomHandle`s from different stores are never comparable in a meaningful
/// sense; nothing prevents passing one to the wrong store, but doing so will
/// reliably surface as [`crate::error::NoeticError::InvalidHandle`] rather
/// than corrupting unrelated data, since generation and index are checked
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AtomHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl AtomHandle {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for AtomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}
