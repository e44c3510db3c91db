//! # Noetic Core
//!
//! An in-memory typed hypergraph knowledge store with an attention-economy
//! allocator, a probabilistic inference engine and a cooperative multi-agent
//! scheduler.
//!
//! - **Atom store**: generational-handle arena holding nodes and links,
//!   deduplicated by `(type, name, outgoing)` and indexed by type and name.
//! - **Attention bank**: short-term/long-term/very-long-term importance
//!   accounting over one store — stimulation, decay, normalisation and
//!   spreading activation.
//! - **Agents and orchestrator**: a homogeneous scheduling contract over
//!   heterogeneous units of work, run in bounded-concurrency batches per
//!   cycle.
//! - **Cognitive loop**: drives the orchestrator on a timer, interleaving
//!   periodic decay and normalisation.
//! - **Inference engine**: forward-chains deduction over typed implication
//!   links using a strength/confidence truth-value calculus.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use noetic_core::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(AtomStore::default());
//! let cat = store.add(builtin_tags::CONCEPT, Some("cat"), vec![], None)?;
//! let animal = store.add(builtin_tags::CONCEPT, Some("animal"), vec![], None)?;
//! store.add(builtin_tags::INHERITANCE, None, vec![cat, animal], None)?;
//!
//! let bank = Arc::new(AttentionBank::new(store.clone(), BankConfig::default()));
//! bank.stimulate(cat, 50.0)?;
//! # Ok::<(), noetic_core::NoeticError>(())
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod agent;
pub mod atom;
pub mod bank;
pub mod error;
pub mod inference;
pub mod query;
pub mod store;

pub use atom::{builtin_tags, AtomHandle, Importance, TruthValue};
pub use error::{NoeticError, Result};
pub use query::PatternQuery;
pub use store::{AtomStore, StoreConfig, StoreEvent, StoreStats};

pub use bank::{AttentionBank, BankConfig, BankEvent, BankStats};

pub use agent::{
    Agent, AgentConfig, AgentHandle, AgentId, AgentOutcome, AgentStats, AttentionAllocationAgent,
};
pub use agent::cognitive_loop::{CognitiveLoop, LoopConfig, LoopEvent, LoopState, LoopStats};
pub use agent::orchestrator::{
    CycleSummary, Orchestrator, OrchestratorConfig, OrchestratorEvent, OrchestratorStats,
    SchedulingPolicy,
};

pub use inference::{ForwardChainReport, InferenceConfig, InferenceEngine, InferenceEvent, InferenceStats};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::{
        builtin_tags, Agent, AgentConfig, AgentHandle, AgentOutcome, AtomHandle, AtomStore,
        AttentionAllocationAgent, AttentionBank, BankConfig, CognitiveLoop, InferenceEngine,
        LoopConfig, NoeticError, Orchestrator, OrchestratorConfig, PatternQuery, Result,
        TruthValue,
    };
}
