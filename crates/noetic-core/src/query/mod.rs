//! Pattern query — read-only structural filters over the store.
//!
//! A pattern is purely a conjunction of clauses; there is no variable
//! binding or unification here. Richer matching belongs to a layer built on
//! top of this core.

use crate::atom::AtomView;

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Type(String),
    Name(String),
    TruthValueMin(f64),
    AttentionMin(f64),
}

impl Clause {
    fn matches(&self, atom: &AtomView) -> bool {
        match self {
            Clause::Type(t) => &atom.type_tag == t,
            Clause::Name(n) => atom.name.as_deref() == Some(n.as_str()),
            Clause::TruthValueMin(s) => atom.truth_value.strength() >= *s,
            Clause::AttentionMin(a) => atom.importance.sti >= *a,
        }
    }
}

/// A conjunction of structural clauses (`type`, `name`, `truthValueMin`,
/// `attentionMin`). An atom matches iff every clause added holds.
///
/// An empty `PatternQuery` matches every atom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternQuery {
    clauses: Vec<Clause>,
}

impl PatternQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the atom's type tag to equal `type_tag`.
    pub fn and_type(mut self, type_tag: impl Into<String>) -> Self {
        self.clauses.push(Clause::Type(type_tag.into()));
        self
    }

    /// Require the atom's display name to equal `name`.
    pub fn and_name(mut self, name: impl Into<String>) -> Self {
        self.clauses.push(Clause::Name(name.into()));
        self
    }

    /// Require the atom's truth-value strength to be at least `min`.
    pub fn and_truth_value_min(mut self, min: f64) -> Self {
        self.clauses.push(Clause::TruthValueMin(min));
        self
    }

    /// Require the atom's STI to be at least `min`.
    pub fn and_attention_min(mut self, min: f64) -> Self {
        self.clauses.push(Clause::AttentionMin(min));
        self
    }

    /// Whether `atom` satisfies every clause in this pattern.
    pub fn matches(&self, atom: &AtomView) -> bool {
        self.clauses.iter().all(|c| c.matches(atom))
    }
}
