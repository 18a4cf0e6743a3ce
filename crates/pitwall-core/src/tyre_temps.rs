//! Simulated per-corner tyre temperatures.
//!
//! The replayed telemetry carries no usable per-corner temperature channel,
//! so the dashboard shows a derived figure: compound base temperature plus
//! a fixed corner offset, an age term, and a lap-keyed variation. Values
//! are cosmetic and never feed back into trigger or strategy logic.

use pitwall_proto::Compound;

/// Snapshot of the four tyre temperatures in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TyreTemps {
    pub front_left: i32,
    pub front_right: i32,
    pub rear_left: i32,
    pub rear_right: i32,
}

impl Default for TyreTemps {
    fn default() -> Self {
        Self {
            front_left: 85,
            front_right: 88,
            rear_left: 82,
            rear_right: 86,
        }
    }
}

impl TyreTemps {
    /// Derives temperatures from the managed driver's current stint.
    pub fn derive(compound: Compound, tyre_age: Option<u32>, lap: u32) -> Self {
        let base = match compound {
            Compound::Soft => 95,
            Compound::Medium => 90,
            _ => 85,
        };
        // Older tyres run hotter; the lap term adds lap-to-lap movement.
        let age_effect = (f64::from(tyre_age.unwrap_or(0)) * 0.5) as i32;
        let variation = ((lap % 7) * 2) as i32;
        let corner = |offset: i32| base + offset + age_effect + variation;

        Self {
            front_left: corner(2),
            front_right: corner(4),
            rear_left: corner(-1),
            rear_right: corner(3),
        }
    }

    /// Fallback when the managed driver has no record for the lap.
    pub fn fallback(lap: u32) -> Self {
        let wobble = (lap % 5) as i32;
        Self {
            front_left: 88 + wobble,
            front_right: 92 + wobble,
            rear_left: 85 + wobble,
            rear_right: 90 + wobble,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_compound_runs_hotter_than_hard() {
        let soft = TyreTemps::derive(Compound::Soft, Some(5), 10);
        let hard = TyreTemps::derive(Compound::Hard, Some(5), 10);
        assert!(soft.front_left > hard.front_left);
    }

    #[test]
    fn derivation_is_deterministic_per_lap() {
        let a = TyreTemps::derive(Compound::Medium, Some(8), 21);
        let b = TyreTemps::derive(Compound::Medium, Some(8), 21);
        assert_eq!(a, b);
    }

    #[test]
    fn age_raises_temperature() {
        let fresh = TyreTemps::derive(Compound::Medium, Some(0), 4);
        let worn = TyreTemps::derive(Compound::Medium, Some(20), 4);
        assert!(worn.rear_right > fresh.rear_right);
    }
}
