//! Strategy plan choices and the persistent decision log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two narrative strategy branches offered per discussion.
///
/// By convention Plan A is always the branch grounded in the historically
/// replayed data; Plan B is the alternative. The decision-analysis scoring
/// depends on this convention, so it is fixed rather than decided by the
/// synthesis role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    A,
    B,
}

impl Plan {
    /// True for the historically executed branch.
    pub fn is_historical(self) -> bool {
        matches!(self, Plan::A)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::A => f.write_str("A"),
            Plan::B => f.write_str("B"),
        }
    }
}

/// One entry of the append-only strategy log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyLogEntry {
    pub lap: u32,
    pub plan: Plan,
    pub decided_at: DateTime<Utc>,
}

impl StrategyLogEntry {
    pub fn new(lap: u32, plan: Plan) -> Self {
        Self {
            lap,
            plan,
            decided_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_a_is_the_historical_branch() {
        assert!(Plan::A.is_historical());
        assert!(!Plan::B.is_historical());
    }

    #[test]
    fn log_entry_serializes_plan_as_letter() {
        let entry = StrategyLogEntry::new(20, Plan::B);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"plan\":\"B\""));
    }
}
