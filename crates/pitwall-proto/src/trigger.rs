//! Strategy-trigger reasons and interruption classification.

use crate::lap::TrackStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A race-control or weather condition qualifying a trigger's context.
///
/// At most one interruption is active per lap; it colors the synthesis and
/// decision-analysis prompts but does not by itself force a discussion
/// (except through the trigger rules in `pitwall-core`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interruption {
    SafetyCarOrRedFlag,
    VirtualSafetyCar,
    Rainfall,
}

impl Interruption {
    /// Human-readable label used in prompts and on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Interruption::SafetyCarOrRedFlag => "Safety Car / Red Flag",
            Interruption::VirtualSafetyCar => "Virtual Safety Car",
            Interruption::Rainfall => "Rainfall / Wet Track",
        }
    }
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a strategy discussion fired on a given lap.
///
/// A lap can carry several reasons at once; they are evaluated
/// independently and unioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerReason {
    /// Periodic checkpoint every tenth lap past lap 1.
    LapInterval(u32),
    /// Safety car or red flag reported in the lap's track status.
    TrackStatusFlag(TrackStatus),
    /// Rain is predicted to arrive on the named lap, one or two laps out.
    RainWarning(u32),
    /// An active interruption not already covered by another reason.
    ActiveInterruption(Interruption),
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerReason::LapInterval(lap) => write!(f, "lap_interval({lap})"),
            TriggerReason::TrackStatusFlag(status) => {
                write!(f, "track_status({})", status.code())
            }
            TriggerReason::RainWarning(lap) => write!(f, "rain_warning(lap {lap})"),
            TriggerReason::ActiveInterruption(kind) => f.write_str(kind.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_tags_match_the_trigger_log_format() {
        assert_eq!(TriggerReason::LapInterval(10).to_string(), "lap_interval(10)");
        assert_eq!(
            TriggerReason::TrackStatusFlag(TrackStatus::SafetyCar).to_string(),
            "track_status(4)"
        );
        assert_eq!(
            TriggerReason::RainWarning(20).to_string(),
            "rain_warning(lap 20)"
        );
        assert_eq!(
            TriggerReason::ActiveInterruption(Interruption::Rainfall).to_string(),
            "Rainfall / Wet Track"
        );
    }
}
