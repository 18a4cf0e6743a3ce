//! Mutable per-run simulation state.
//!
//! One instance exists per running session. Outside this crate the state is
//! read-only; every mutation is funneled through the phase state machine in
//! [`crate::sim`] and its direct helpers (trigger evaluation caches the
//! predicted rain lap here).

use crate::orchestrator::Discussion;
use crate::tyre_temps::TyreTemps;
use pitwall_proto::{Interruption, Plan, StrategyLogEntry};

/// Phase of the lap-progression state machine.
///
/// Transitions are strictly sequential; a discussion is never skipped once
/// a trigger has fired. `Chosen` and `Shown` freeze their screens so a
/// re-render cannot re-invoke generators or duplicate log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Normal playback: evaluate triggers, render the dashboard, advance.
    Normal,
    /// A trigger fired; the pit crew is deliberating.
    StrategyDiscussion,
    /// Commentary is rendered; waiting for the user to pick a plan.
    AwaitingChoice,
    /// A plan was picked; the choice screen is frozen.
    Chosen,
    /// First render of the decision analysis.
    ShowingOutcome,
    /// Outcome rendered; waiting for the user to continue.
    Shown,
    /// The replay has reached the final lap and stopped.
    Finished,
}

/// Mutable state for one simulation run.
///
/// Created at simulation start and discarded on stop/restart.
#[derive(Debug)]
pub struct SimulationState {
    pub(crate) current_lap: u32,
    pub(crate) phase: Phase,
    pub(crate) chosen_plan: Option<Plan>,
    /// Append-only log of decisions, one entry per completed discussion.
    pub(crate) strategy_log: Vec<StrategyLogEntry>,
    /// Lap on which the last discussion fired; prevents re-triggering on
    /// idempotent re-entry.
    pub(crate) last_triggered_lap: Option<u32>,
    /// Predicted rain lap. Outer `None` until computed once per run;
    /// `Some(None)` when the session has no rainfall at all.
    pub(crate) predicted_rain_lap: Option<Option<u32>>,
    /// Commentary for the current discussion; populated at most once per
    /// lap and cleared when a new discussion starts.
    pub(crate) commentary: Option<Discussion>,
    pub(crate) outcome_paragraphs: Vec<String>,
    /// Active interruption context, cleared when no longer applicable.
    pub(crate) interruption: Option<Interruption>,
    pub(crate) tyre_temps: TyreTemps,
    /// Last lap a scripted radio exchange was shown (0 = never).
    pub(crate) last_radio_lap: u32,
    pub(crate) discussion_completed: bool,
    pub(crate) choice_processed: bool,
}

impl SimulationState {
    /// Fresh state positioned on lap 1 in normal playback.
    pub fn new() -> Self {
        Self {
            current_lap: 1,
            phase: Phase::Normal,
            chosen_plan: None,
            strategy_log: Vec::new(),
            last_triggered_lap: None,
            predicted_rain_lap: None,
            commentary: None,
            outcome_paragraphs: Vec::new(),
            interruption: None,
            tyre_temps: TyreTemps::default(),
            last_radio_lap: 0,
            discussion_completed: false,
            choice_processed: false,
        }
    }

    pub fn current_lap(&self) -> u32 {
        self.current_lap
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn chosen_plan(&self) -> Option<Plan> {
        self.chosen_plan
    }

    pub fn strategy_log(&self) -> &[StrategyLogEntry] {
        &self.strategy_log
    }

    pub fn last_triggered_lap(&self) -> Option<u32> {
        self.last_triggered_lap
    }

    /// Predicted rain lap once computed; `None` before first evaluation or
    /// when the session stays dry.
    pub fn predicted_rain_lap(&self) -> Option<u32> {
        self.predicted_rain_lap.flatten()
    }

    /// Whether the rain prediction has been computed for this run.
    pub fn rain_prediction_cached(&self) -> bool {
        self.predicted_rain_lap.is_some()
    }

    pub fn commentary(&self) -> Option<&Discussion> {
        self.commentary.as_ref()
    }

    pub fn outcome_paragraphs(&self) -> &[String] {
        &self.outcome_paragraphs
    }

    pub fn interruption(&self) -> Option<Interruption> {
        self.interruption
    }

    pub fn tyre_temps(&self) -> TyreTemps {
        self.tyre_temps
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}
