//! The lap-progression phase state machine.
//!
//! `Simulation` owns the per-run state and is the only writer to it. The
//! host calls [`Simulation::tick`] once per rendering pass; suspension at
//! user-interaction boundaries is nothing more than state persisted
//! between ticks, so a spurious re-render of the same phase never
//! re-invokes a generator or duplicates a log entry.

use crate::briefing::RoleBriefings;
use crate::orchestrator::{CommentaryOrchestrator, Discussion};
use crate::radio::{radio_exchange_for_lap, RadioExchange};
use crate::session::SessionData;
use crate::state::{Phase, SimulationState};
use crate::trigger::evaluate_triggers;
use crate::tyre_temps::TyreTemps;
use crate::view::DashboardView;
use pitwall_proto::{Plan, RoleGenerator, TriggerReason};
use tracing::{debug, info, warn};

/// What the host should render after one tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Normal playback: dashboard for the current lap, plus any scripted
    /// radio chatter and the trigger verdict. When `triggers` is
    /// non-empty the next tick opens the discussion.
    Dashboard {
        view: DashboardView,
        radio: Option<RadioExchange>,
        triggers: Vec<TriggerReason>,
    },
    /// Discussion complete; render commentary and the two plan controls,
    /// then call [`Simulation::choose`].
    AwaitingChoice { discussion: Discussion },
    /// Decision analysis ready; render the paragraphs, then call
    /// [`Simulation::confirm_outcome`].
    Outcome {
        choice: Plan,
        matched_history: bool,
        paragraphs: Vec<String>,
    },
    /// The replay has ended.
    Finished,
}

/// The controlling loop: playback, trigger detection, discussion, choice,
/// outcome, advance.
#[derive(Debug)]
pub struct Simulation<G> {
    session: SessionData,
    driver: String,
    state: SimulationState,
    orchestrator: CommentaryOrchestrator<G>,
}

impl<G: RoleGenerator> Simulation<G> {
    pub fn new(session: SessionData, driver: impl Into<String>, generator: G) -> Self {
        let driver = driver.into();
        info!(driver, total_laps = session.total_laps(), "simulation ready");
        Self {
            session,
            driver,
            state: SimulationState::new(),
            orchestrator: CommentaryOrchestrator::new(generator),
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn session(&self) -> &SessionData {
        &self.session
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Runs one step of the phase machine and reports what to render.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.current_lap > self.session.total_laps() {
            self.state.phase = Phase::Finished;
        }

        match self.state.phase {
            Phase::Normal => self.tick_normal(),
            Phase::StrategyDiscussion => self.tick_discussion(),
            Phase::AwaitingChoice | Phase::Chosen => self.tick_awaiting(),
            Phase::ShowingOutcome | Phase::Shown => self.tick_outcome(),
            Phase::Finished => TickOutcome::Finished,
        }
    }

    /// Records the user's plan choice.
    ///
    /// Only honored while a choice is pending; repeated or out-of-phase
    /// calls are ignored, so the two plan controls are mutually exclusive
    /// per lap.
    pub fn choose(&mut self, plan: Plan) {
        match self.state.phase {
            Phase::AwaitingChoice | Phase::Chosen => {
                info!(lap = self.state.current_lap, %plan, "plan chosen");
                self.state.chosen_plan = Some(plan);
                self.state.phase = Phase::ShowingOutcome;
            }
            _ => warn!(phase = ?self.state.phase, "choose() ignored outside choice phase"),
        }
    }

    /// Confirms the outcome screen and advances to the next lap.
    pub fn confirm_outcome(&mut self) {
        match self.state.phase {
            Phase::ShowingOutcome | Phase::Shown => {
                self.state.outcome_paragraphs.clear();
                self.advance();
            }
            _ => warn!(phase = ?self.state.phase, "confirm_outcome() ignored"),
        }
    }

    /// Stops the run; the state machine becomes terminal.
    pub fn stop(&mut self) {
        self.state.phase = Phase::Finished;
    }

    fn tick_normal(&mut self) -> TickOutcome {
        let lap = self.state.current_lap;
        let triggers = evaluate_triggers(&self.session, &mut self.state, lap);
        self.refresh_tyre_temps(lap);

        let radio = self.maybe_radio(lap);
        let view = DashboardView::build(
            &self.session,
            lap,
            &self.driver,
            self.state.tyre_temps,
            self.state.interruption,
        );

        if !triggers.is_empty() && self.state.last_triggered_lap != Some(lap) {
            self.state.last_triggered_lap = Some(lap);
            self.state.phase = Phase::StrategyDiscussion;
            self.state.discussion_completed = false;
            self.state.choice_processed = false;
            self.state.chosen_plan = None;
            self.state.commentary = None;
            debug!(lap, "entering strategy discussion");
        } else {
            // No new trigger (or this lap's trigger was already handled);
            // the lap plays back and the run moves on.
            self.advance();
        }

        TickOutcome::Dashboard {
            view,
            radio,
            triggers,
        }
    }

    fn tick_discussion(&mut self) -> TickOutcome {
        if !self.state.discussion_completed {
            let lap = self.state.current_lap;
            let briefings = RoleBriefings::build(&self.session, lap, &self.driver);
            let discussion = self
                .orchestrator
                .run_discussion(&briefings, self.state.interruption);
            self.state.commentary = Some(discussion);
            self.state.discussion_completed = true;
            self.refresh_tyre_temps(lap);
        }
        self.state.phase = Phase::AwaitingChoice;
        self.tick_awaiting()
    }

    fn tick_awaiting(&mut self) -> TickOutcome {
        // Freeze after the first render so a refresh cannot re-open the
        // discussion path.
        self.state.phase = Phase::Chosen;
        match self.state.commentary.clone() {
            Some(discussion) => TickOutcome::AwaitingChoice { discussion },
            // Cache lost (should not happen); degrade to terminal rather
            // than re-invoking generators outside the guarded path.
            None => {
                warn!("commentary cache empty while awaiting choice");
                self.state.phase = Phase::Finished;
                TickOutcome::Finished
            }
        }
    }

    fn tick_outcome(&mut self) -> TickOutcome {
        let lap = self.state.current_lap;
        let choice = self.state.chosen_plan.unwrap_or(Plan::A);

        if !self.state.choice_processed {
            self.state
                .strategy_log
                .push(pitwall_proto::StrategyLogEntry::new(lap, choice));

            let briefings = RoleBriefings::build(&self.session, lap, &self.driver);
            let paragraphs = match &self.state.commentary {
                Some(discussion) => self.orchestrator.analyze_decision(
                    self.session.meta(),
                    lap,
                    &briefings,
                    choice,
                    discussion,
                ),
                None => vec!["Decision analysis unavailable: no discussion context.".to_string()],
            };
            self.state.outcome_paragraphs = paragraphs;
            self.state.choice_processed = true;
        }

        self.state.phase = Phase::Shown;
        TickOutcome::Outcome {
            choice,
            matched_history: choice.is_historical(),
            paragraphs: self.state.outcome_paragraphs.clone(),
        }
    }

    /// Moves to the next lap, or stops at the end of the replay.
    fn advance(&mut self) {
        if self.state.current_lap < self.session.total_laps() {
            self.state.current_lap += 1;
            self.state.phase = Phase::Normal;
            self.state.discussion_completed = false;
            self.state.choice_processed = false;
            self.state.chosen_plan = None;
        } else {
            info!(
                lap = self.state.current_lap,
                decisions = self.state.strategy_log.len(),
                "race finished"
            );
            self.state.phase = Phase::Finished;
        }
    }

    fn refresh_tyre_temps(&mut self, lap: u32) {
        self.state.tyre_temps = match self.session.driver_lap(lap, &self.driver) {
            Some(record) => TyreTemps::derive(record.compound, record.tyre_age, lap),
            None => TyreTemps::fallback(lap),
        };
    }

    fn maybe_radio(&mut self, lap: u32) -> Option<RadioExchange> {
        if self.state.last_radio_lap == lap {
            return None;
        }
        let position = self
            .session
            .driver_lap(lap, &self.driver)
            .and_then(|r| r.position)?;
        let exchange = radio_exchange_for_lap(lap, self.session.total_laps(), position)?;
        self.state.last_radio_lap = lap;
        Some(exchange)
    }
}
