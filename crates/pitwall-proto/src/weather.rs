//! Weather samples attached to a session.

use crate::lap::secs;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One weather observation, time-ordered within the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Offset of the observation from the session start.
    #[serde(with = "secs")]
    pub time: Duration,
    /// Whether rain was falling at the time of the sample.
    pub rainfall: bool,
    /// Air temperature in degrees Celsius.
    pub air_temp: f32,
    /// Track surface temperature in degrees Celsius.
    pub track_temp: f32,
}
