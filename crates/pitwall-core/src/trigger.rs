//! Strategy-trigger evaluation and interruption classification.

use crate::session::SessionData;
use crate::state::SimulationState;
use pitwall_proto::{Interruption, TriggerReason};
use tracing::debug;

/// Classifies the interruption context for a lap.
///
/// The three checks run in a fixed order and the last match wins: a wet
/// track outranks a safety car label for prompt purposes, since the
/// weather condition persists after race control withdraws the car.
pub fn classify_interruption(session: &SessionData, lap: u32) -> Option<Interruption> {
    let records = session.laps_for(lap);
    let mut kind = None;

    if records
        .iter()
        .any(|r| r.track_status.is_safety_car_or_red_flag())
    {
        kind = Some(Interruption::SafetyCarOrRedFlag);
    }
    if records.iter().any(|r| r.track_status.is_virtual_safety_car()) {
        kind = Some(Interruption::VirtualSafetyCar);
    }
    if let Some(start) = session.lap_start(lap) {
        if session
            .weather_at_or_before(start)
            .is_some_and(|w| w.rainfall)
        {
            kind = Some(Interruption::Rainfall);
        }
    }

    kind
}

/// Evaluates all strategy triggers for `lap`.
///
/// Returns the ordered, de-duplicated reasons; empty when nothing fired.
/// Whether a discussion actually opens is decided by the phase state
/// machine, which additionally requires that this lap has not already been
/// processed.
///
/// Side effects on `state`: caches the predicted rain lap on first
/// evaluation (never recomputed afterwards) and stores or clears the
/// active interruption.
pub fn evaluate_triggers(
    session: &SessionData,
    state: &mut SimulationState,
    lap: u32,
) -> Vec<TriggerReason> {
    let mut reasons = Vec::new();

    // Periodic checkpoint every tenth lap.
    if lap > 1 && lap % 10 == 0 {
        reasons.push(TriggerReason::LapInterval(lap));
    }

    // Safety car or red flag anywhere in the lap's records. Virtual safety
    // car is tracked through the interruption channel only.
    if let Some(record) = session
        .laps_for(lap)
        .iter()
        .find(|r| r.track_status.is_safety_car_or_red_flag())
    {
        reasons.push(TriggerReason::TrackStatusFlag(record.track_status.clone()));
    }

    // Rain onset: the predicted rain lap is computed once per run from the
    // first rainfall sample, joined to the first lap starting at or after
    // that sample's timestamp.
    if !state.rain_prediction_cached() {
        let predicted = session
            .first_rain()
            .and_then(|sample| session.lap_starting_at_or_after(sample.time));
        state.predicted_rain_lap = Some(predicted);
        if let Some(rain_lap) = predicted {
            debug!(rain_lap, "rain onset predicted");
        }
    }
    if let Some(rain_lap) = state.predicted_rain_lap() {
        if lap + 2 == rain_lap || lap + 1 == rain_lap {
            reasons.push(TriggerReason::RainWarning(rain_lap));
        }
    }

    // Interruption classification runs on a separate channel; it is kept
    // in state for prompt construction and merged into the reasons unless
    // the track-status trigger already covers it.
    let interruption = classify_interruption(session, lap);
    state.interruption = interruption;
    if let Some(kind) = interruption {
        let already_covered = kind == Interruption::SafetyCarOrRedFlag
            && reasons
                .iter()
                .any(|r| matches!(r, TriggerReason::TrackStatusFlag(_)));
        if !already_covered {
            reasons.push(TriggerReason::ActiveInterruption(kind));
        }
    }

    if !reasons.is_empty() {
        debug!(lap, reasons = %format_reasons(&reasons), "strategy triggers fired");
    }
    reasons
}

fn format_reasons(reasons: &[TriggerReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
