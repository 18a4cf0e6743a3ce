//! Offline scripted backend.
//!
//! Serves pre-written pit-wall commentary with no network dependency. The
//! variant picked for a role depends only on the prompt text, so replaying
//! the same lap yields the same commentary.

use pitwall_proto::{Result, RoleGenerator, RoleId};
use tracing::debug;

const ENGINEER_LINES: &[&str] = &[
    "Pace looks strong, brake temps in the window. Gap ahead is steady, keep \
     this rhythm going. Chief, over to you.",
    "Fuel delta on target and the balance is where we want it. Watch kerb \
     usage in the final sector. Chief, over to you.",
    "Car behind is not closing, sector two remains our strongest. Nothing to \
     report on systems. Chief, over to you.",
];

const TYRE_LINES: &[&str] = &[
    "Current set holding at 0.05s/lap degradation, temps stable across the \
     axle. Pit window opens in roughly 6 laps. Chief, tire summary over.",
    "Wear is tracking ahead of model, rears running warm. Recommend a window \
     within 4 laps if pace drops. Chief, tire summary over.",
    "Grip delta to a fresh set is under three tenths, no urgency. Window in \
     8 laps on current numbers. Chief, tire summary over.",
];

const WEATHER_LINES: &[&str] = &[
    "Radar is clean within 30 kilometers, track temp steady. Precipitation \
     probability under ten percent. Chief, weather update complete.",
    "A cell is developing to the west; timing uncertain but conditions may \
     change within the next handful of laps. Chief, weather update complete.",
    "Conditions stable, light wind down the main straight and no rain threat \
     on the horizon. Chief, weather update complete.",
];

const RIVAL_LINES: &[&str] = &[
    "Biggest threat is the car directly behind on fresher rubber, closing a \
     tenth a lap; cover the undercut if they box. Chief, rivals intel \
     delivered.",
    "The cars ahead are locked in their own fight and losing time to us; the \
     real risk is an early stop from the chasing pack. Chief, rivals intel \
     delivered.",
];

const SYNTHESIS_LINES: &[&str] = &[
    "Plan A: stay out and extend this stint, holding track position while the \
     pace delta stays small. The objective is keeping clean air and forcing \
     the cars behind to commit first.\n\n\
     Plan B: box this lap for the undercut onto fresh rubber. The objective \
     is jumping the car ahead before their stop, accepting temporary traffic.\n\n\
     Team Principal, your decision: A or B.",
    "Plan A: hold position and run the planned stint length; the tires have \
     margin and the gap behind is stable. The objective is minimum risk to \
     the end of this phase.\n\n\
     Plan B: react to the cars around us and take the aggressive stop now. \
     The objective is converting fresh-tire pace into positions on track.\n\n\
     Team Principal, your decision: A or B.",
];

const ANALYST_LINES: &[&str] = &[
    "Good call. Your choice lines up with what the team actually did at this \
     point in the race, and the data backed it.\n\n\
     Track position was the deciding factor: the pace gain from fresh tires \
     was smaller than the time lost rejoining in traffic.\n\n\
     The lesson here is that an undercut only pays when the delta per lap \
     exceeds the rejoin cost, and today it did not.",
    "Interesting pick. The team went the other way historically, and on the \
     day their call was the safer one.\n\n\
     Your plan was not wrong in principle: with a bigger pace delta or a \
     cheaper pit loss it becomes the winning move.\n\n\
     Keep weighing track position against tire life; that trade decides most \
     of these calls.",
];

/// A deterministic offline generator for demos and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedGenerator;

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self
    }

    fn pool(role: RoleId) -> &'static [&'static str] {
        match role {
            RoleId::Engineer => ENGINEER_LINES,
            RoleId::TyreExpert => TYRE_LINES,
            RoleId::Weather => WEATHER_LINES,
            RoleId::Rival => RIVAL_LINES,
            RoleId::Synthesis => SYNTHESIS_LINES,
            RoleId::DecisionAnalyst => ANALYST_LINES,
        }
    }
}

impl RoleGenerator for ScriptedGenerator {
    fn generate(&self, role: RoleId, prompt: &str) -> Result<String> {
        let pool = Self::pool(role);
        let index = prompt.len() % pool.len();
        debug!(%role, index, "scripted reply served");
        Ok(pool[index].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitwall_core::has_both_plans;

    #[test]
    fn same_prompt_yields_the_same_reply() {
        let gen = ScriptedGenerator::new();
        let a = gen.generate(RoleId::Engineer, "lap 12 update").unwrap();
        let b = gen.generate(RoleId::Engineer, "lap 12 update").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_synthesis_variant_satisfies_the_plan_predicate() {
        for line in SYNTHESIS_LINES {
            assert!(has_both_plans(line));
        }
    }

    #[test]
    fn analyst_variants_segment_into_multiple_paragraphs() {
        for line in ANALYST_LINES {
            assert!(pitwall_core::segment_paragraphs(line).len() >= 3);
        }
    }
}
