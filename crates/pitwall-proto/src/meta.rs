//! Session identity and driver results metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Results metadata for one driver, joinable to lap records by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    /// Stable driver code (e.g. "VER").
    pub code: String,
    /// Car number.
    pub number: u32,
    pub team: String,
    /// Team color as a hex string without the leading `#`.
    pub team_color: String,
}

/// Identity of a loaded session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub year: u16,
    /// Event name as selected by the user (e.g. "Bahrain").
    pub race: String,
    /// Session kind token (e.g. "R" for the race).
    pub kind: String,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    pub total_laps: u32,
    pub drivers: Vec<DriverInfo>,
}

impl SessionMeta {
    /// Looks up a driver's results row by code.
    pub fn driver(&self, code: &str) -> Option<&DriverInfo> {
        self.drivers.iter().find(|d| d.code == code)
    }
}
