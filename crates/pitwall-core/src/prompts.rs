//! Fixed prompt templates for the pit-crew roles.
//!
//! Every role is a closed variant with one template; the generator backend
//! receives a single self-contained prompt per exchange (persona plus
//! rendered context), since backends keep no multi-turn memory.

use crate::briefing::RoleBriefings;
use crate::orchestrator::Discussion;
use pitwall_proto::{Interruption, Plan, RoleId, SessionMeta};
use std::fmt::Write as _;

const ENGINEER_PERSONA: &str = "\
You are the Formula 1 Race Engineer speaking over the team radio.
Respond with concise factual updates and measured technical details; keep
messages short, with the occasional lighter touch real engineers allow
themselves. Bring in personalized elements like the driver's name to make
it feel authentic. End your message with: 'Chief, over to you.'";

const TYRE_PERSONA: &str = "\
You are the Tire Specialist dedicated to tire performance metrics.
Analyze compound wear, degradation rates (% loss per lap), temperature
windows, and grip delta. Speak in clear, actionable snippets, e.g.
'Current Softs at 95C, degradation 0.04s/lap.' Recommend a pit window in
lap numbers. End with: 'Chief, tire summary over.'";

const WEATHER_PERSONA: &str = "\
You are the Meteorologist on the pit wall.
Provide precise, data-driven weather updates: current track conditions,
radar trends, probability of precipitation, and the timing of any rain
cells, in professional broadcasting style. End with: 'Chief, weather
update complete.'";

const RIVAL_PERSONA: &str = "\
You are the Competitor Analyst.
Evaluate rivals' pace, pit strategies, and tire choices. Highlight the
biggest threat (driver, team) and a recommended defensive action, as a
single one-shot team radio paragraph with no bullet points. Conclude:
'Chief, rivals intel delivered.'";

const SYNTHESIS_PERSONA: &str = "\
You are the Chief Race Strategist. You will receive a single consolidated
briefing containing reports from the Race Engineer, Tire Expert, Weather
Forecaster, and Rival Analyst. Your only task is to synthesize this
information and deliver two distinct, actionable strategic plans.

- Plan A must be based on the historical move provided in the briefing,
  with its objective stated in the same paragraph. Your response must not
  reveal that this was the historical move; it should read as a real-time
  decision.
- Plan B must be a creative, data-driven alternative, in its own
  paragraph, with its objective stated clearly.

Write it the way team members actually talk to each other on the pit
wall. Conclude your response only with the two plans, then end your
entire message with: 'Team Principal, your decision: A or B.'";

const ANALYST_PERSONA: &str = "\
You are an F1 Decision Analyst with deep expertise in race strategy.
Compare the user's choice with the historically executed decision and
explain it in clear, amateur-friendly language: validate correct calls
with solid reasons, and for divergent calls explain when they would be
right and why they were risky here. Be encouraging and educational,
never dismissive.";

/// Renders role prompts from briefings and discussion context.
#[derive(Debug, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// The fixed persona text for a role.
    pub fn persona(role: RoleId) -> &'static str {
        match role {
            RoleId::Engineer => ENGINEER_PERSONA,
            RoleId::TyreExpert => TYRE_PERSONA,
            RoleId::Weather => WEATHER_PERSONA,
            RoleId::Rival => RIVAL_PERSONA,
            RoleId::Synthesis => SYNTHESIS_PERSONA,
            RoleId::DecisionAnalyst => ANALYST_PERSONA,
        }
    }

    /// Prompt for one of the four specialist roles.
    ///
    /// # Panics
    /// Never panics for specialist roles; calling it with `Synthesis` or
    /// `DecisionAnalyst` is a programming error.
    pub fn specialist_prompt(role: RoleId, briefings: &RoleBriefings) -> String {
        let task = match role {
            RoleId::Engineer => format!(
                "Driver: {}, Position: {}, Lap: {}. Give your standard technical update.",
                briefings.driver,
                briefings.position_label(),
                briefings.lap,
            ),
            RoleId::TyreExpert => format!(
                "Driver: {} is on {} tires that are {} laps old. Report on wear, \
                 degradation, and temperature.",
                briefings.driver, briefings.compound, briefings.tyre_age,
            ),
            RoleId::Weather => format!(
                "Current forecast is: {} Confirm the outlook.",
                briefings.rain_outlook
            ),
            RoleId::Rival => {
                let mut intel = String::new();
                for rival in &briefings.rivals {
                    let _ = writeln!(
                        intel,
                        "- P{} {} on {} ({} laps old).",
                        rival.position, rival.driver, rival.compound, rival.tyre_age
                    );
                }
                if intel.is_empty() {
                    intel.push_str("- no rivals within range.\n");
                }
                format!(
                    "Our driver {} is {}. Nearby rivals:\n{}Analyze the immediate threats.",
                    briefings.driver,
                    briefings.position_label(),
                    intel,
                )
            }
            RoleId::Synthesis | RoleId::DecisionAnalyst => {
                unreachable!("{role} is not a specialist role")
            }
        };
        format!("{}\n\n{task}", Self::persona(role))
    }

    /// Consolidated prompt for the synthesis role: situation briefing,
    /// historical fact, optional interruption, and all specialist reports.
    pub fn synthesis_prompt(
        briefings: &RoleBriefings,
        reports: &[(String, String)],
        interruption: Option<Interruption>,
    ) -> String {
        let mut prompt = format!(
            "{}\n\n{}\n\n{}\n",
            Self::persona(RoleId::Synthesis),
            briefings.synthesis.briefing,
            briefings.synthesis.historical_fact,
        );
        if let Some(kind) = interruption {
            let _ = writeln!(prompt, "\nACTIVE INTERRUPTION: {kind}");
        }
        prompt.push_str("\n---**CONSOLIDATED TEAM REPORTS**---\n");
        for (name, text) in reports {
            let _ = writeln!(prompt, "**{name} Report:**\n{text}\n");
        }
        prompt.push_str(
            "---**END OF REPORTS**---\n\n\
             Chief Strategist, using all the above information, provide Plan A and Plan B.",
        );
        prompt
    }

    /// Prompt for the decision-analysis pass, issued after the user picks
    /// a plan.
    pub fn analysis_prompt(
        meta: &SessionMeta,
        lap: u32,
        briefings: &RoleBriefings,
        choice: Plan,
        discussion: &Discussion,
    ) -> String {
        let total = meta.total_laps.max(1);
        let progress = (f64::from(lap) / f64::from(total) * 100.0).round();
        let mut prompt = format!(
            "{}\n\nRACE CONTEXT:\n\
             - Event: {} {} ({})\n\
             - Lap: {lap}/{total} ({progress}%)\n\
             - Driver: {} - Position: {}\n\
             - Tyres: {} - Age: {} laps\n",
            Self::persona(RoleId::DecisionAnalyst),
            meta.year,
            meta.race,
            meta.kind,
            briefings.driver,
            briefings.position_label(),
            briefings.compound,
            briefings.tyre_age,
        );

        if let Some(kind) = discussion.interruption() {
            let _ = write!(
                prompt,
                "\nINTERRUPTION CONTEXT:\n- {kind}\n\
                 Treat the interruption as the highest-priority factor: open by \
                 stating how it changed the strategy options.\n"
            );
        }

        prompt.push_str("\nTEAM COMMUNICATIONS (short excerpts):\n");
        for (name, text) in discussion.reports() {
            let excerpt = truncate(text, 300);
            let _ = writeln!(prompt, "- {name}: {excerpt}");
        }

        let historical = Plan::A;
        let _ = write!(
            prompt,
            "\nPlan {historical} is the historically executed plan; Plan B was not \
             taken. The user chose Plan {choice} and does not know which plan is \
             historical.\n\n\
             Write 3-4 concise paragraphs, in order: first a short validation \
             sentence stating whether Plan {choice} is the historically chosen \
             plan; then the strategic reasons the team chose Plan {historical}, \
             citing tyres, track position, or the communications above; then, if \
             the user diverged, the concrete risks of that divergence and when it \
             could be viable; finally the practical lesson to take away. \
             Separate paragraphs with blank lines and return plain text only."
        );
        prompt
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::briefing::{RivalSnapshot, SynthesisBriefing};
    use pitwall_proto::Compound;

    fn briefings() -> RoleBriefings {
        RoleBriefings {
            driver: "HAM".to_string(),
            lap: 20,
            position: Some(4),
            compound: Compound::Soft,
            tyre_age: 12,
            rain_outlook: "No rain expected in the next few laps.".to_string(),
            rivals: vec![RivalSnapshot {
                position: 3,
                driver: "VER".to_string(),
                compound: Compound::Medium,
                tyre_age: 8,
            }],
            synthesis: SynthesisBriefing {
                briefing: "Your driver HAM is P4.".to_string(),
                historical_fact: "CRITICAL INFO: **No**".to_string(),
            },
        }
    }

    #[test]
    fn specialist_prompts_carry_their_context() {
        let b = briefings();
        let engineer = PromptBuilder::specialist_prompt(RoleId::Engineer, &b);
        assert!(engineer.contains("Position: P4"));
        assert!(engineer.contains("Lap: 20"));

        let tyre = PromptBuilder::specialist_prompt(RoleId::TyreExpert, &b);
        assert!(tyre.contains("SOFT tires that are 12 laps old"));

        let rival = PromptBuilder::specialist_prompt(RoleId::Rival, &b);
        assert!(rival.contains("- P3 VER on MEDIUM (8 laps old)."));
    }

    #[test]
    fn rival_prompt_handles_clear_track() {
        let mut b = briefings();
        b.rivals.clear();
        let rival = PromptBuilder::specialist_prompt(RoleId::Rival, &b);
        assert!(rival.contains("no rivals within range"));
    }

    #[test]
    fn synthesis_prompt_embeds_reports_and_interruption() {
        let b = briefings();
        let reports = vec![("Race Engineer".to_string(), "All good.".to_string())];
        let prompt = PromptBuilder::synthesis_prompt(
            &b,
            &reports,
            Some(Interruption::SafetyCarOrRedFlag),
        );
        assert!(prompt.contains("**Race Engineer Report:**"));
        assert!(prompt.contains("ACTIVE INTERRUPTION: Safety Car / Red Flag"));
        assert!(prompt.contains("CRITICAL INFO"));
        assert!(prompt.ends_with("provide Plan A and Plan B."));
    }

    #[test]
    fn truncate_caps_long_reports() {
        let long = "x".repeat(400);
        let out = truncate(&long, 300);
        assert_eq!(out.chars().count(), 303);
        assert!(out.ends_with("..."));
    }
}
