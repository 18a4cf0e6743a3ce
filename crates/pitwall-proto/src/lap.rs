//! Per-lap telemetry records replayed by the simulator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Serde adapters storing durations as fractional seconds.
///
/// Session fixtures are hand-editable JSON; `{secs, nanos}` pairs would
/// make them unreadable, so offsets and lap times are stored as `f64`
/// seconds on the wire.
pub(crate) mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let v = f64::deserialize(d)?;
        Duration::try_from_secs_f64(v)
            .map_err(|e| serde::de::Error::custom(format!("invalid duration {v}: {e}")))
    }

    pub mod opt {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
            match d {
                Some(d) => s.serialize_some(&d.as_secs_f64()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<Duration>, D::Error> {
            let v = Option::<f64>::deserialize(d)?;
            v.map(|v| {
                Duration::try_from_secs_f64(v)
                    .map_err(|e| serde::de::Error::custom(format!("invalid duration {v}: {e}")))
            })
            .transpose()
        }
    }
}

/// Tyre compound fitted for a lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    /// Compound missing or unrecognized in the source data.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
            Compound::Intermediate => "INTERMEDIATE",
            Compound::Wet => "WET",
            Compound::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Race-control track status for a lap.
///
/// Upstream timing data encodes track status as a string of digit tokens;
/// a lap may carry several at once (e.g. yellow sectors plus a safety car).
/// Parsing keeps the most severe condition: red flag, then safety car,
/// then virtual safety car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrackStatus {
    Clear,
    SafetyCar,
    RedFlag,
    VirtualSafetyCar,
    /// Unrecognized status token, preserved verbatim.
    Other(String),
}

impl TrackStatus {
    /// Parses a raw status token string from the timing feed.
    pub fn from_code(code: &str) -> Self {
        if code.contains('5') {
            TrackStatus::RedFlag
        } else if code.contains('4') {
            TrackStatus::SafetyCar
        } else if code.contains('6') || code.contains('7') {
            TrackStatus::VirtualSafetyCar
        } else if code.is_empty() || code.chars().all(|c| c == '1' || c == '2' || c == '3') {
            TrackStatus::Clear
        } else {
            TrackStatus::Other(code.to_string())
        }
    }

    /// Canonical status code, as emitted by the timing feed.
    pub fn code(&self) -> &str {
        match self {
            TrackStatus::Clear => "1",
            TrackStatus::SafetyCar => "4",
            TrackStatus::RedFlag => "5",
            TrackStatus::VirtualSafetyCar => "6",
            TrackStatus::Other(code) => code,
        }
    }

    /// True for conditions that force a strategy discussion.
    pub fn is_safety_car_or_red_flag(&self) -> bool {
        matches!(self, TrackStatus::SafetyCar | TrackStatus::RedFlag)
    }

    pub fn is_virtual_safety_car(&self) -> bool {
        matches!(self, TrackStatus::VirtualSafetyCar)
    }

    /// Human-readable label for display surfaces.
    pub fn label(&self) -> &str {
        match self {
            TrackStatus::Clear => "Green",
            TrackStatus::SafetyCar => "Safety Car",
            TrackStatus::RedFlag => "Red Flag",
            TrackStatus::VirtualSafetyCar => "Virtual Safety Car",
            TrackStatus::Other(code) => code,
        }
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for TrackStatus {
    fn from(code: String) -> Self {
        TrackStatus::from_code(&code)
    }
}

impl From<TrackStatus> for String {
    fn from(status: TrackStatus) -> Self {
        status.code().to_string()
    }
}

/// One driver's telemetry and status for one lap.
///
/// Immutable once loaded; owned exclusively by the session store and
/// read-only to every other component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// Lap number, starting at 1.
    pub lap: u32,
    /// Stable driver code for the session (e.g. "HAM").
    pub driver: String,
    /// Classification position; `None` while in the pit or unclassified.
    pub position: Option<u32>,
    pub compound: Compound,
    /// Tyre age in laps at the start of this lap.
    pub tyre_age: Option<u32>,
    /// Completed lap time; `None` for in/out laps without a time.
    #[serde(default, with = "secs::opt")]
    pub lap_time: Option<Duration>,
    /// Offset of the lap start from the session start.
    #[serde(with = "secs")]
    pub lap_start: Duration,
    #[serde(default = "default_track_status")]
    pub track_status: TrackStatus,
    /// Pit entry timestamp, set on the lap the car entered the pit lane.
    #[serde(default, with = "secs::opt")]
    pub pit_in: Option<Duration>,
    /// Pit exit timestamp, set on the lap the car left the pit lane.
    #[serde(default, with = "secs::opt")]
    pub pit_out: Option<Duration>,
}

fn default_track_status() -> TrackStatus {
    TrackStatus::Clear
}
