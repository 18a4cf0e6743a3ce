//! Role definitions for the scripted pit-crew personas.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of pit-crew roles.
///
/// Each role has a fixed prompt template and a fixed position in the
/// discussion: the four specialists report first (in [`RoleId::specialists`]
/// order), the synthesis role consolidates them into two plans, and the
/// decision analyst only runs after the user has chosen a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    /// Race engineer on the radio: concise technical updates.
    Engineer,
    /// Tyre specialist: compound wear, degradation, pit window.
    TyreExpert,
    /// Meteorologist on the pit wall: rain outlook.
    Weather,
    /// Competitor analyst: nearby rivals and threats.
    Rival,
    /// Chief strategist: consolidates reports into Plan A / Plan B.
    Synthesis,
    /// Decision analyst: post-choice explanation of the outcome.
    DecisionAnalyst,
}

impl RoleId {
    /// The four specialist roles, in the fixed order they report.
    pub const fn specialists() -> [RoleId; 4] {
        [
            RoleId::Engineer,
            RoleId::TyreExpert,
            RoleId::Weather,
            RoleId::Rival,
        ]
    }

    /// Display name used to key commentary output and label radio cards.
    pub fn display_name(self) -> &'static str {
        match self {
            RoleId::Engineer => "Race Engineer",
            RoleId::TyreExpert => "Tire Expert",
            RoleId::Weather => "Weather Forecaster",
            RoleId::Rival => "Rival Analyst",
            RoleId::Synthesis => "Chief Strategist",
            RoleId::DecisionAnalyst => "Decision Analyst",
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialist_order_is_fixed() {
        let order = RoleId::specialists();
        assert_eq!(order[0], RoleId::Engineer);
        assert_eq!(order[3], RoleId::Rival);
    }

    #[test]
    fn synthesis_keys_as_chief_strategist() {
        assert_eq!(RoleId::Synthesis.display_name(), "Chief Strategist");
    }
}
