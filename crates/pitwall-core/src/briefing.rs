//! Per-role context bundles built from the current lap's data.
//!
//! Building a briefing never mutates lap data and never fails hard: when
//! the managed driver has no record for the lap (in the pit or not
//! classified) the bundle degrades to best-effort partial context.

use crate::session::SessionData;
use pitwall_proto::Compound;

/// One nearby rival reduced to the fields the rival analyst needs.
///
/// Drivers missing position or tyre-age data are excluded at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RivalSnapshot {
    pub position: u32,
    pub driver: String,
    pub compound: Compound,
    pub tyre_age: u32,
}

/// Context handed to the synthesis role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisBriefing {
    /// Situation summary: driver, position, compound, tyre age, outlook.
    pub briefing: String,
    /// Ground truth from the replayed data: whether the managed driver's
    /// next lap record shows a pit entry, and the compound fitted. The
    /// synthesis role dresses this up as Plan A without revealing that it
    /// is historical.
    pub historical_fact: String,
}

/// Targeted context slices for every role, built once per discussion.
#[derive(Debug, Clone)]
pub struct RoleBriefings {
    pub driver: String,
    pub lap: u32,
    pub position: Option<u32>,
    pub compound: Compound,
    /// Tyre age in laps; 0 when the source data has no figure.
    pub tyre_age: u32,
    /// Textual forecast for the weather role, derived from the first
    /// rainfall sample strictly after this lap's start.
    pub rain_outlook: String,
    /// Rivals within five positions either side, position-sorted.
    pub rivals: Vec<RivalSnapshot>,
    pub synthesis: SynthesisBriefing,
}

impl RoleBriefings {
    /// Gathers all role contexts for `driver` on `lap`.
    pub fn build(session: &SessionData, lap: u32, driver: &str) -> Self {
        let record = session.driver_lap(lap, driver);
        let position = record.and_then(|r| r.position);
        let compound = record.map_or(Compound::Unknown, |r| r.compound);
        let tyre_age = record.and_then(|r| r.tyre_age).unwrap_or(0);

        let lap_start = record
            .map(|r| r.lap_start)
            .or_else(|| session.lap_start(lap));
        let rain_outlook = match lap_start
            .and_then(|start| session.first_rain_after(start))
            .and_then(|sample| session.lap_starting_at_or_after(sample.time))
        {
            Some(rain_lap) => format!("Rain is possible around lap {rain_lap}."),
            None => "No rain expected in the next few laps.".to_string(),
        };

        let rivals = position.map_or_else(Vec::new, |pos| {
            let lo = pos.saturating_sub(5);
            let hi = pos + 5;
            let mut rivals: Vec<RivalSnapshot> = session
                .laps_for(lap)
                .iter()
                .filter(|r| r.driver != driver)
                .filter_map(|r| {
                    let rival_pos = r.position?;
                    let rival_age = r.tyre_age?;
                    (rival_pos >= lo && rival_pos <= hi).then(|| RivalSnapshot {
                        position: rival_pos,
                        driver: r.driver.clone(),
                        compound: r.compound,
                        tyre_age: rival_age,
                    })
                })
                .collect();
            rivals.sort_by_key(|r| r.position);
            rivals
        });

        let synthesis = SynthesisBriefing {
            briefing: format!(
                "You have received reports from your team. Your driver {driver} is {} \
                 on {tyre_age}-lap-old {compound} tires. {rain_outlook}",
                position_label(position),
            ),
            historical_fact: format!(
                "CRITICAL INFO: In the real race, did {driver} pit at the end of this lap? \
                 **{}**",
                historical_pit_answer(session, lap, driver),
            ),
        };

        Self {
            driver: driver.to_string(),
            lap,
            position,
            compound,
            tyre_age,
            rain_outlook,
            rivals,
            synthesis,
        }
    }

    /// Display label for the managed driver's position.
    pub fn position_label(&self) -> String {
        position_label(self.position)
    }
}

fn position_label(position: Option<u32>) -> String {
    position.map_or_else(|| "in the pit lane".to_string(), |p| format!("P{p}"))
}

/// Whether the replayed data shows a pit entry at the end of this lap.
fn historical_pit_answer(session: &SessionData, lap: u32, driver: &str) -> String {
    match session.driver_lap(lap + 1, driver) {
        Some(next) if next.pit_in.is_some() => {
            format!("Yes, pitted for {} tires.", next.compound)
        }
        _ => "No".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitwall_proto::{LapRecord, SessionMeta, TrackStatus, WeatherSample};
    use std::time::Duration;

    fn record(
        lap: u32,
        driver: &str,
        position: Option<u32>,
        compound: Compound,
        tyre_age: Option<u32>,
    ) -> LapRecord {
        LapRecord {
            lap,
            driver: driver.to_string(),
            position,
            compound,
            tyre_age,
            lap_time: Some(Duration::from_secs(91)),
            lap_start: Duration::from_secs(u64::from(lap - 1) * 90),
            track_status: TrackStatus::Clear,
            pit_in: None,
            pit_out: None,
        }
    }

    fn session(laps: Vec<LapRecord>, weather: Vec<WeatherSample>) -> SessionData {
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
            weather,
        )
    }

    #[test]
    fn rivals_are_limited_to_five_positions_either_side() {
        let mut laps = vec![record(5, "HAM", Some(8), Compound::Medium, Some(7))];
        for (i, code) in ["VER", "PER", "LEC", "SAI", "ALO", "NOR", "RUS"]
            .iter()
            .enumerate()
        {
            laps.push(record(
                5,
                code,
                Some(2 + i as u32 * 2), // P2, P4, ... P14
                Compound::Hard,
                Some(10),
            ));
        }
        let data = session(laps, Vec::new());
        let briefings = RoleBriefings::build(&data, 5, "HAM");

        assert!(briefings.rivals.iter().all(|r| r.position >= 3));
        assert!(briefings.rivals.iter().all(|r| r.position <= 13));
        assert!(briefings.rivals.windows(2).all(|w| w[0].position <= w[1].position));
    }

    #[test]
    fn rivals_missing_data_are_excluded() {
        let laps = vec![
            record(3, "HAM", Some(4), Compound::Soft, Some(3)),
            record(3, "VER", None, Compound::Hard, Some(9)),
            record(3, "PER", Some(5), Compound::Hard, None),
            record(3, "LEC", Some(6), Compound::Hard, Some(9)),
        ];
        let data = session(laps, Vec::new());
        let briefings = RoleBriefings::build(&data, 3, "HAM");

        assert_eq!(briefings.rivals.len(), 1);
        assert_eq!(briefings.rivals[0].driver, "LEC");
    }

    #[test]
    fn missing_managed_driver_degrades_to_partial_context() {
        let laps = vec![record(2, "VER", Some(1), Compound::Soft, Some(2))];
        let data = session(laps, Vec::new());
        let briefings = RoleBriefings::build(&data, 2, "HAM");

        assert_eq!(briefings.position, None);
        assert_eq!(briefings.compound, Compound::Unknown);
        assert_eq!(briefings.tyre_age, 0);
        assert!(briefings.rivals.is_empty());
        assert!(briefings.synthesis.briefing.contains("in the pit lane"));
    }

    #[test]
    fn historical_fact_reports_next_lap_pit_entry() {
        let mut pit_lap = record(11, "HAM", Some(6), Compound::Hard, Some(0));
        pit_lap.pit_in = Some(Duration::from_secs(990));
        let laps = vec![record(10, "HAM", Some(4), Compound::Soft, Some(9)), pit_lap];
        let data = session(laps, Vec::new());
        let briefings = RoleBriefings::build(&data, 10, "HAM");

        assert!(
            briefings
                .synthesis
                .historical_fact
                .contains("Yes, pitted for HARD tires.")
        );
    }

    #[test]
    fn historical_fact_is_no_without_a_pit_entry() {
        let laps = vec![
            record(10, "HAM", Some(4), Compound::Soft, Some(9)),
            record(11, "HAM", Some(4), Compound::Soft, Some(10)),
        ];
        let data = session(laps, Vec::new());
        let briefings = RoleBriefings::build(&data, 10, "HAM");
        assert!(briefings.synthesis.historical_fact.ends_with("**No**"));
    }

    #[test]
    fn rain_outlook_names_the_future_lap() {
        let laps: Vec<LapRecord> = (1..=20)
            .map(|l| record(l, "HAM", Some(3), Compound::Medium, Some(l)))
            .collect();
        let rain_time = Duration::from_secs(14 * 90); // lap 15's start
        let weather = vec![WeatherSample {
            time: rain_time,
            rainfall: true,
            air_temp: 20.0,
            track_temp: 28.0,
        }];
        let data = session(laps, weather);

        let briefings = RoleBriefings::build(&data, 5, "HAM");
        assert_eq!(briefings.rain_outlook, "Rain is possible around lap 15.");

        // From lap 15 onwards the sample is no longer strictly in the future.
        let briefings = RoleBriefings::build(&data, 15, "HAM");
        assert_eq!(
            briefings.rain_outlook,
            "No rain expected in the next few laps."
        );
    }
}
