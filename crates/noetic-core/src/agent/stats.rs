//! Per-agent running counters.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Read-only snapshot of one agent's execution history.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentStats {
    pub run_count: u64,
    pub total_time: Duration,
    pub avg_time: Duration,
    pub last_run: Option<DateTime<Utc>>,
}
