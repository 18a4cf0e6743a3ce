//! Deterministic generator doubles for tests.
//!
//! `CannedGenerator` serves fixed per-role replies and records every call,
//! which lets tests assert both the content and the exact number of
//! exchanges (the idempotence guarantees depend on the latter).

use pitwall_proto::{Error, Result, RoleGenerator, RoleId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// A scripted generator with fixed replies and call accounting.
#[derive(Debug, Default)]
pub struct CannedGenerator {
    replies: HashMap<RoleId, String>,
    failing: HashSet<RoleId>,
    calls: RefCell<Vec<RoleId>>,
}

impl CannedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a fixed reply for a role.
    pub fn with_reply(mut self, role: RoleId, text: impl Into<String>) -> Self {
        self.replies.insert(role, text.into());
        self
    }

    /// Makes calls for `role` fail with a `GeneratorFailure`.
    pub fn failing(mut self, role: RoleId) -> Self {
        self.failing.insert(role);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RoleId> {
        self.calls.borrow().clone()
    }

    /// Number of calls made for one role.
    pub fn calls_for(&self, role: RoleId) -> usize {
        self.calls.borrow().iter().filter(|r| **r == role).count()
    }

    fn default_reply(role: RoleId) -> String {
        match role {
            RoleId::Engineer => "Pace is solid, gaps stable. Chief, over to you.".to_string(),
            RoleId::TyreExpert => {
                "Degradation nominal, window opens in 6 laps. Chief, tire summary over."
                    .to_string()
            }
            RoleId::Weather => "Radar is clear for now. Chief, weather update complete.".to_string(),
            RoleId::Rival => {
                "Closest threat is the car behind on fresher rubber. Chief, rivals intel delivered."
                    .to_string()
            }
            RoleId::Synthesis => {
                "Plan A: stay out and extend the stint, covering track position.\n\n\
                 Plan B: box this lap for the undercut.\n\n\
                 Team Principal, your decision: A or B."
                    .to_string()
            }
            RoleId::DecisionAnalyst => {
                "That matches the historical call.\n\nTrack position was worth more than \
                 fresh tyres here.\n\nLesson: protect the position when the pace delta is small."
                    .to_string()
            }
        }
    }
}

impl RoleGenerator for CannedGenerator {
    fn generate(&self, role: RoleId, _prompt: &str) -> Result<String> {
        self.calls.borrow_mut().push(role);
        if self.failing.contains(&role) {
            return Err(Error::generator(role, "canned failure"));
        }
        Ok(self
            .replies
            .get(&role)
            .cloned()
            .unwrap_or_else(|| Self::default_reply(role)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_and_serves_defaults() {
        let gen = CannedGenerator::new();
        let reply = gen.generate(RoleId::Synthesis, "anything").unwrap();
        assert!(reply.to_lowercase().contains("plan a:"));
        assert_eq!(gen.calls_for(RoleId::Synthesis), 1);
    }

    #[test]
    fn failing_role_errors() {
        let gen = CannedGenerator::new().failing(RoleId::Engineer);
        assert!(gen.generate(RoleId::Engineer, "x").is_err());
    }
}
