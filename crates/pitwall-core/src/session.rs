//! Session store: immutable lap and weather data for one loaded session.

use pitwall_proto::{
    DriverInfo, Error, LapRecord, Result, SessionMeta, WeatherSample,
};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// A telemetry provider resolving `(year, race, kind)` to session data.
///
/// Failure surfaces as a single [`Error::DataUnavailable`] with a
/// human-readable cause; the caller presents it and halts before the run
/// starts, never mid-loop.
pub trait SessionProvider {
    fn load(&self, year: u16, race: &str, kind: &str) -> Result<SessionData>;
}

/// On-disk shape of a session fixture.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    meta: SessionMeta,
    laps: Vec<LapRecord>,
    #[serde(default)]
    weather: Vec<WeatherSample>,
}

/// Immutable lap/weather table for one session, read-only after load.
///
/// Laps are kept sorted by `(lap, driver)` and weather by time, so per-lap
/// slices and time lookups are binary searches.
#[derive(Debug)]
pub struct SessionData {
    meta: SessionMeta,
    laps: Vec<LapRecord>,
    weather: Vec<WeatherSample>,
    /// Earliest lap-start offset per lap number, in lap order.
    lap_starts: Vec<(u32, Duration)>,
}

impl SessionData {
    /// Builds the store from already-deserialized parts.
    pub fn new(meta: SessionMeta, mut laps: Vec<LapRecord>, mut weather: Vec<WeatherSample>) -> Self {
        laps.sort_by(|a, b| a.lap.cmp(&b.lap).then_with(|| a.driver.cmp(&b.driver)));
        weather.sort_by_key(|w| w.time);

        let mut lap_starts: Vec<(u32, Duration)> = Vec::new();
        for record in &laps {
            match lap_starts.last_mut() {
                Some((lap, start)) if *lap == record.lap => {
                    if record.lap_start < *start {
                        *start = record.lap_start;
                    }
                }
                _ => lap_starts.push((record.lap, record.lap_start)),
            }
        }

        let mut meta = meta;
        if meta.total_laps == 0 {
            meta.total_laps = laps.iter().map(|r| r.lap).max().unwrap_or(0);
        }

        Self {
            meta,
            laps,
            weather,
            lap_starts,
        }
    }

    /// Reads a session fixture from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: SessionFile = serde_json::from_reader(BufReader::new(reader))
            .map_err(|e| Error::data_unavailable(format!("malformed session fixture: {e}")))?;
        Ok(Self::new(file.meta, file.laps, file.weather))
    }

    /// Reads a session fixture from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            Error::data_unavailable(format!("cannot open {}: {e}", path.display()))
        })?;
        let data = Self::from_reader(file)?;
        debug!(
            laps = data.laps.len(),
            weather = data.weather.len(),
            "loaded session fixture from {}",
            path.display()
        );
        Ok(data)
    }

    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    pub fn drivers(&self) -> &[DriverInfo] {
        &self.meta.drivers
    }

    pub fn total_laps(&self) -> u32 {
        self.meta.total_laps
    }

    /// All drivers' records for one lap, sorted by driver code.
    pub fn laps_for(&self, lap: u32) -> &[LapRecord] {
        let start = self.laps.partition_point(|r| r.lap < lap);
        let end = self.laps.partition_point(|r| r.lap <= lap);
        &self.laps[start..end]
    }

    /// One driver's record for one lap, if it exists.
    ///
    /// A missing record indicates an in-pit or non-classified state, not a
    /// data error.
    pub fn driver_lap(&self, lap: u32, driver: &str) -> Option<&LapRecord> {
        self.laps_for(lap).iter().find(|r| r.driver == driver)
    }

    /// All of one driver's records up to and including `lap`, in lap order.
    pub fn driver_history(&self, driver: &str, lap: u32) -> Vec<&LapRecord> {
        self.laps
            .iter()
            .filter(|r| r.driver == driver && r.lap <= lap)
            .collect()
    }

    /// Earliest start offset of a lap, if any car recorded it.
    pub fn lap_start(&self, lap: u32) -> Option<Duration> {
        self.lap_starts
            .iter()
            .find(|(l, _)| *l == lap)
            .map(|(_, start)| *start)
    }

    /// Latest weather sample at or before `time`.
    pub fn weather_at_or_before(&self, time: Duration) -> Option<&WeatherSample> {
        let idx = self.weather.partition_point(|w| w.time <= time);
        idx.checked_sub(1).map(|i| &self.weather[i])
    }

    /// First rainfall sample strictly after `time`.
    pub fn first_rain_after(&self, time: Duration) -> Option<&WeatherSample> {
        self.weather
            .iter()
            .find(|w| w.time > time && w.rainfall)
    }

    /// First rainfall sample anywhere in the session.
    pub fn first_rain(&self) -> Option<&WeatherSample> {
        self.weather.iter().find(|w| w.rainfall)
    }

    /// First lap whose start offset is at or after `time`.
    pub fn lap_starting_at_or_after(&self, time: Duration) -> Option<u32> {
        self.lap_starts
            .iter()
            .find(|(_, start)| *start >= time)
            .map(|(lap, _)| *lap)
    }
}

/// Loads session fixtures from a directory of JSON files.
///
/// Fixtures are named `<year>_<race>_<kind>.json` with the race name
/// lowercased and spaces replaced by underscores (e.g.
/// `2023_bahrain_R.json`).
#[derive(Debug, Clone)]
pub struct JsonSessionProvider {
    dir: PathBuf,
}

impl JsonSessionProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Fixture path for a session identifier.
    pub fn fixture_path(&self, year: u16, race: &str, kind: &str) -> PathBuf {
        let race = race.to_lowercase().replace(' ', "_");
        self.dir.join(format!("{year}_{race}_{kind}.json"))
    }

    /// Lists the fixture files present in the directory.
    pub fn available(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".json"))
            .collect();
        names.sort();
        names
    }
}

impl SessionProvider for JsonSessionProvider {
    fn load(&self, year: u16, race: &str, kind: &str) -> Result<SessionData> {
        let path = self.fixture_path(year, race, kind);
        if !path.exists() {
            return Err(Error::data_unavailable(format!(
                "no session fixture for {year} {race} {kind} (expected {})",
                path.display()
            )));
        }
        let data = SessionData::from_file(&path)?;
        info!(
            year,
            race,
            kind,
            total_laps = data.total_laps(),
            "session loaded"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitwall_proto::{Compound, TrackStatus};
    use std::io::Write;

    fn record(lap: u32, driver: &str, start_secs: u64) -> LapRecord {
        LapRecord {
            lap,
            driver: driver.to_string(),
            position: Some(1),
            compound: Compound::Medium,
            tyre_age: Some(lap),
            lap_time: Some(Duration::from_secs(93)),
            lap_start: Duration::from_secs(start_secs),
            track_status: TrackStatus::Clear,
            pit_in: None,
            pit_out: None,
        }
    }

    fn meta(total_laps: u32) -> SessionMeta {
        SessionMeta {
            year: 2023,
            race: "Bahrain".to_string(),
            kind: "R".to_string(),
            event_date: None,
            total_laps,
            drivers: Vec::new(),
        }
    }

    #[test]
    fn laps_for_returns_the_per_lap_slice() {
        let laps = vec![
            record(2, "VER", 100),
            record(1, "HAM", 0),
            record(1, "VER", 0),
            record(2, "HAM", 101),
        ];
        let data = SessionData::new(meta(2), laps, Vec::new());

        let slice = data.laps_for(1);
        assert_eq!(slice.len(), 2);
        assert!(slice.iter().all(|r| r.lap == 1));
        assert_eq!(data.driver_lap(2, "HAM").unwrap().lap_start.as_secs(), 101);
        assert!(data.driver_lap(3, "HAM").is_none());
    }

    #[test]
    fn lap_start_uses_the_earliest_record() {
        let laps = vec![record(1, "HAM", 5), record(1, "VER", 3)];
        let data = SessionData::new(meta(1), laps, Vec::new());
        assert_eq!(data.lap_start(1), Some(Duration::from_secs(3)));
    }

    #[test]
    fn weather_lookup_is_latest_at_or_before() {
        let weather = vec![
            WeatherSample {
                time: Duration::from_secs(10),
                rainfall: false,
                air_temp: 28.0,
                track_temp: 41.0,
            },
            WeatherSample {
                time: Duration::from_secs(60),
                rainfall: true,
                air_temp: 24.0,
                track_temp: 35.0,
            },
        ];
        let data = SessionData::new(meta(1), vec![record(1, "HAM", 0)], weather);

        assert!(data.weather_at_or_before(Duration::from_secs(5)).is_none());
        assert!(
            !data
                .weather_at_or_before(Duration::from_secs(30))
                .unwrap()
                .rainfall
        );
        assert!(
            data.weather_at_or_before(Duration::from_secs(60))
                .unwrap()
                .rainfall
        );
        assert_eq!(
            data.first_rain_after(Duration::from_secs(10)).unwrap().time,
            Duration::from_secs(60)
        );
        assert!(data.first_rain_after(Duration::from_secs(60)).is_none());
    }

    #[test]
    fn total_laps_derived_when_meta_omits_it() {
        let laps = vec![record(1, "HAM", 0), record(7, "HAM", 700)];
        let data = SessionData::new(meta(0), laps, Vec::new());
        assert_eq!(data.total_laps(), 7);
    }

    #[test]
    fn provider_reports_missing_fixture_as_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonSessionProvider::new(dir.path());
        let err = provider.load(2023, "Jeddah", "R").unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
        assert!(err.to_string().contains("2023 Jeddah R"));
    }

    #[test]
    fn provider_loads_a_fixture_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let provider = JsonSessionProvider::new(dir.path());
        let file = SessionFile {
            meta: meta(2),
            laps: vec![record(1, "HAM", 0), record(2, "HAM", 95)],
            weather: Vec::new(),
        };
        let path = provider.fixture_path(2023, "Bahrain", "R");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(serde_json::to_string(&file).unwrap().as_bytes())
            .unwrap();

        let data = provider.load(2023, "Bahrain", "R").unwrap();
        assert_eq!(data.total_laps(), 2);
        assert_eq!(data.laps_for(2).len(), 1);
    }
}
