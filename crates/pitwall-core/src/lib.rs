//! # pitwall-core
//!
//! Core simulation functionality for the Pit Wall simulator.
//!
//! This crate provides:
//! - The session store holding immutable replayed telemetry
//! - Strategy-trigger evaluation and interruption classification
//! - Per-role briefing construction and prompt templates
//! - The commentary orchestrator sequencing the pit-crew generators
//! - The lap-progression phase state machine
//! - Configuration loading and the dashboard view-model

mod briefing;
mod config;
mod orchestrator;
mod prompts;
mod radio;
mod session;
mod sim;
mod state;
pub mod testing;
mod trigger;
mod tyre_temps;
mod view;

pub use briefing::{RivalSnapshot, RoleBriefings, SynthesisBriefing};
pub use config::{ConfigError, GeneratorBackendConfig, PlaybackConfig, SessionSelection, SimConfig};
pub use orchestrator::{has_both_plans, segment_paragraphs, CommentaryOrchestrator, Discussion};
pub use prompts::PromptBuilder;
pub use radio::{radio_exchange_for_lap, RadioExchange};
pub use session::{JsonSessionProvider, SessionData, SessionProvider};
pub use sim::{Simulation, TickOutcome};
pub use state::{Phase, SimulationState};
pub use trigger::{classify_interruption, evaluate_triggers};
pub use tyre_temps::TyreTemps;
pub use view::{format_lap_time, DashboardView, DriverPanel, GapDisplay, TimingRow};
