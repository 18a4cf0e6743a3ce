//! Commentary orchestration: sequencing the pit-crew generator calls.

use crate::briefing::RoleBriefings;
use crate::prompts::PromptBuilder;
use pitwall_proto::{Interruption, Plan, RoleGenerator, RoleId, SessionMeta};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Fallback text substituted when a single role call fails.
const NO_RESPONSE: &str = "No response";

/// Key under which an active interruption appears in the display entries.
const INTERRUPTION_KEY: &str = "InterruptionContext";

/// Consolidated output of one discussion.
///
/// Reports are keyed by role display name, in the order the roles spoke
/// (the four specialists, then "Chief Strategist").
#[derive(Debug, Clone)]
pub struct Discussion {
    reports: Vec<(String, String)>,
    interruption: Option<Interruption>,
}

impl Discussion {
    /// All reports in speaking order, excluding the interruption entry.
    pub fn reports(&self) -> &[(String, String)] {
        &self.reports
    }

    /// Looks up a report by display name; `"InterruptionContext"` resolves
    /// to the active interruption label.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name == INTERRUPTION_KEY {
            return self.interruption.map(Interruption::label);
        }
        self.reports
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }

    pub fn interruption(&self) -> Option<Interruption> {
        self.interruption
    }

    /// Entries for rendering, with the interruption context appended when
    /// one was active.
    pub fn display_entries(&self) -> Vec<(String, String)> {
        let mut entries = self.reports.clone();
        if let Some(kind) = self.interruption {
            entries.push((INTERRUPTION_KEY.to_string(), kind.label().to_string()));
        }
        entries
    }
}

/// True when a synthesis reply contains both labeled plans.
///
/// This is the discussion's termination predicate. The contract is
/// one-shot: a reply failing the predicate is still accepted as final,
/// the predicate only drives logging and display hints.
pub fn has_both_plans(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("plan a:") && lower.contains("plan b:")
}

/// Splits generator output into display paragraphs.
///
/// Primary split is on blank lines. If that yields a single block, a
/// secondary split on sentence boundaries followed by two or more spaces
/// (or a lone newline) is applied, accepted only when it produces between
/// two and five fragments. Downstream rendering therefore never receives
/// one undifferentiated wall of text that could have been segmented.
pub fn segment_paragraphs(text: &str) -> Vec<String> {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    let blank = BLANK_LINES.get_or_init(|| Regex::new(r"\n\s*\n").expect("static regex"));

    let mut parts: Vec<String> = blank
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string)
        .collect();

    if parts.len() == 1 {
        let fragments = split_sentence_groups(&parts[0]);
        if fragments.len() > 1 && fragments.len() <= 5 {
            parts = fragments;
        }
    }
    parts
}

fn split_sentence_groups(block: &str) -> Vec<String> {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    let boundary = BOUNDARY.get_or_init(|| Regex::new(r"\.\s{2,}|\n").expect("static regex"));

    let mut fragments = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(block) {
        // Keep the closing period with its sentence group.
        let end = if block[m.start()..].starts_with('.') {
            m.start() + 1
        } else {
            m.start()
        };
        let fragment = block[start..end].trim();
        if !fragment.is_empty() {
            fragments.push(fragment.to_string());
        }
        start = m.end();
    }
    let tail = block[start..].trim();
    if !tail.is_empty() {
        fragments.push(tail.to_string());
    }
    fragments
}

/// Sequences the role-generator calls for a discussion and for the
/// post-choice decision analysis.
///
/// Calls are strictly ordered: the four specialists complete before the
/// synthesis call begins. A failed role call is replaced by a neutral
/// fallback and never aborts the others.
#[derive(Debug)]
pub struct CommentaryOrchestrator<G> {
    generator: G,
}

impl<G: RoleGenerator> CommentaryOrchestrator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Runs the full discussion: four specialist exchanges, then one
    /// synthesis exchange over the consolidated report.
    pub fn run_discussion(
        &self,
        briefings: &RoleBriefings,
        interruption: Option<Interruption>,
    ) -> Discussion {
        let mut reports: Vec<(String, String)> = Vec::with_capacity(5);

        for role in RoleId::specialists() {
            let prompt = PromptBuilder::specialist_prompt(role, briefings);
            let text = self.exchange(role, &prompt);
            reports.push((role.display_name().to_string(), text));
        }

        let prompt = PromptBuilder::synthesis_prompt(briefings, &reports, interruption);
        let plans = self.exchange(RoleId::Synthesis, &prompt);
        if !has_both_plans(&plans) {
            // One-shot contract: accepted as final anyway.
            debug!("synthesis reply missing plan markers");
        }
        reports.push((RoleId::Synthesis.display_name().to_string(), plans));

        Discussion {
            reports,
            interruption,
        }
    }

    /// Runs the decision-analysis pass for a recorded choice.
    ///
    /// Returns ordered display paragraphs; a total failure of the analyst
    /// call degrades to a single apologetic paragraph naming the cause.
    pub fn analyze_decision(
        &self,
        meta: &SessionMeta,
        lap: u32,
        briefings: &RoleBriefings,
        choice: Plan,
        discussion: &Discussion,
    ) -> Vec<String> {
        let prompt = PromptBuilder::analysis_prompt(meta, lap, briefings, choice, discussion);
        match self.generator.generate(RoleId::DecisionAnalyst, &prompt) {
            Ok(text) => {
                let paragraphs = segment_paragraphs(&text);
                if paragraphs.is_empty() {
                    vec![format!(
                        "Decision analysis returned no text for Plan {choice}."
                    )]
                } else {
                    paragraphs
                }
            }
            Err(e) => {
                warn!(lap, "decision analysis failed: {e}");
                vec![format!("Decision analysis failed to run: {e}")]
            }
        }
    }

    /// One guarded exchange with a role; failures degrade to fallback text.
    fn exchange(&self, role: RoleId, prompt: &str) -> String {
        match self.generator.generate(role, prompt) {
            Ok(text) => text,
            Err(e) => {
                warn!(%role, "generator call failed, substituting fallback: {e}");
                NO_RESPONSE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::briefing::SynthesisBriefing;
    use crate::testing::CannedGenerator;
    use pitwall_proto::Compound;

    fn briefings() -> RoleBriefings {
        RoleBriefings {
            driver: "HAM".to_string(),
            lap: 20,
            position: Some(4),
            compound: Compound::Soft,
            tyre_age: 12,
            rain_outlook: "No rain expected in the next few laps.".to_string(),
            rivals: Vec::new(),
            synthesis: SynthesisBriefing {
                briefing: "Your driver HAM is P4.".to_string(),
                historical_fact: "CRITICAL INFO: **No**".to_string(),
            },
        }
    }

    #[test]
    fn termination_predicate_requires_both_markers() {
        assert!(has_both_plans("PLAN A: push. Plan B: box now."));
        assert!(!has_both_plans("Plan A: push and hope."));
        assert!(!has_both_plans("no plans at all"));
    }

    #[test]
    fn discussion_orders_specialists_before_the_chief() {
        let gen = CannedGenerator::new();
        let orchestrator = CommentaryOrchestrator::new(&gen);
        let discussion = orchestrator.run_discussion(&briefings(), None);

        let names: Vec<&str> = discussion
            .reports()
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Race Engineer",
                "Tire Expert",
                "Weather Forecaster",
                "Rival Analyst",
                "Chief Strategist"
            ]
        );
        assert_eq!(
            gen.calls().last().copied(),
            Some(RoleId::Synthesis),
            "synthesis must be the final exchange"
        );
    }

    #[test]
    fn failed_role_is_replaced_by_fallback_and_others_continue() {
        let gen = CannedGenerator::new().failing(RoleId::Weather);
        let orchestrator = CommentaryOrchestrator::new(&gen);
        let discussion = orchestrator.run_discussion(&briefings(), None);

        assert_eq!(discussion.get("Weather Forecaster"), Some(NO_RESPONSE));
        assert!(discussion.get("Chief Strategist").is_some());
        assert_eq!(gen.calls().len(), 5);
    }

    #[test]
    fn markerless_synthesis_reply_is_still_accepted() {
        let gen = CannedGenerator::new()
            .with_reply(RoleId::Synthesis, "Honestly, just keep driving.");
        let orchestrator = CommentaryOrchestrator::new(&gen);
        let discussion = orchestrator.run_discussion(&briefings(), None);

        let chief = discussion.get("Chief Strategist").unwrap();
        assert_eq!(chief, "Honestly, just keep driving.");
        assert!(!has_both_plans(chief));
        // Exactly one synthesis exchange; no retry.
        assert_eq!(gen.calls_for(RoleId::Synthesis), 1);
    }

    #[test]
    fn interruption_appears_in_display_entries() {
        let gen = CannedGenerator::new();
        let orchestrator = CommentaryOrchestrator::new(&gen);
        let discussion =
            orchestrator.run_discussion(&briefings(), Some(Interruption::VirtualSafetyCar));

        assert_eq!(
            discussion.get("InterruptionContext"),
            Some("Virtual Safety Car")
        );
        let entries = discussion.display_entries();
        assert_eq!(entries.last().unwrap().0, "InterruptionContext");
    }

    #[test]
    fn blank_line_split_is_primary() {
        let text = "First paragraph.\n\nSecond paragraph.\n\n\nThird.";
        assert_eq!(
            segment_paragraphs(text),
            vec!["First paragraph.", "Second paragraph.", "Third."]
        );
    }

    #[test]
    fn single_block_falls_back_to_sentence_groups() {
        let text = "You chose well.  The tyres were gone.  Pit windows matter.";
        assert_eq!(
            segment_paragraphs(text),
            vec!["You chose well.", "The tyres were gone.", "Pit windows matter."]
        );
    }

    #[test]
    fn oversized_sentence_split_keeps_the_single_block() {
        let text = "A.  B.  C.  D.  E.  F.  G.";
        let parts = segment_paragraphs(text);
        assert_eq!(parts.len(), 1, "more than five fragments keeps one block");
    }

    #[test]
    fn failed_analysis_degrades_to_one_paragraph() {
        let gen = CannedGenerator::new().failing(RoleId::DecisionAnalyst);
        let orchestrator = CommentaryOrchestrator::new(&gen);
        let discussion = orchestrator.run_discussion(&briefings(), None);

        let meta = SessionMeta {
            year: 2023,
            race: "Bahrain".to_string(),
            kind: "R".to_string(),
            event_date: None,
            total_laps: 57,
            drivers: Vec::new(),
        };
        let paragraphs =
            orchestrator.analyze_decision(&meta, 20, &briefings(), Plan::B, &discussion);
        assert_eq!(paragraphs.len(), 1);
        assert!(paragraphs[0].starts_with("Decision analysis failed to run:"));
    }
}
