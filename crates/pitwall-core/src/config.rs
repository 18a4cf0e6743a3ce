//! Configuration types for the Pit Wall simulator.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which session to replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSelection {
    #[serde(default = "default_year")]
    pub year: u16,
    #[serde(default = "default_race")]
    pub race: String,
    /// Session kind token; "R" is the race.
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Directory holding session fixtures.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for SessionSelection {
    fn default() -> Self {
        Self {
            year: default_year(),
            race: default_race(),
            kind: default_kind(),
            data_dir: default_data_dir(),
        }
    }
}

/// Playback pacing during normal laps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between laps in normal playback, in milliseconds. Pacing
    /// only; never a correctness mechanism.
    #[serde(default = "default_lap_delay_ms")]
    pub lap_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            lap_delay_ms: default_lap_delay_ms(),
        }
    }
}

/// Text-generation backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorBackendConfig {
    /// Backend name: "scripted" (offline, deterministic) or "http"
    /// (OpenAI-compatible chat completions endpoint).
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key for the http backend.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GeneratorBackendConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub session: SessionSelection,
    /// Driver the user manages; empty means "pick the first available".
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub generator: GeneratorBackendConfig,
}

impl SimConfig {
    /// Loads a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text)?;
        debug!("loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.generator.backend.as_str() {
            "scripted" | "http" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown generator backend '{other}' (expected 'scripted' or 'http')"
                )));
            }
        }
        if self.session.kind.is_empty() {
            return Err(ConfigError::Invalid("session kind is empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.generator.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature {} out of range [0, 2]",
                self.generator.temperature
            )));
        }
        Ok(())
    }
}

fn default_year() -> u16 {
    2023
}

fn default_race() -> String {
    "Bahrain".to_string()
}

fn default_kind() -> String {
    "R".to_string()
}

fn default_data_dir() -> String {
    "sessions".to_string()
}

fn default_lap_delay_ms() -> u64 {
    2000
}

fn default_backend() -> String {
    "scripted".to_string()
}

fn default_model() -> String {
    "llama3-8b-8192".to_string()
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_uses_defaults() {
        let config: SimConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.session.year, 2023);
        assert_eq!(config.session.kind, "R");
        assert_eq!(config.generator.backend, "scripted");
        assert_eq!(config.playback.lap_delay_ms, 2000);
        config.validate().unwrap();
    }

    #[test]
    fn partial_yaml_overrides_selected_fields() {
        let yaml = r#"
session:
  year: 2022
  race: "Monza"
driver: "LEC"
generator:
  backend: "http"
  model: "llama3-70b-8192"
"#;
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.session.year, 2022);
        assert_eq!(config.session.race, "Monza");
        assert_eq!(config.driver, "LEC");
        assert_eq!(config.generator.backend, "http");
        // Untouched sections keep their defaults.
        assert_eq!(config.session.kind, "R");
        config.validate().unwrap();
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let yaml = "generator:\n  backend: \"quantum\"\n";
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitwall.yml");
        std::fs::write(&path, "driver: \"HAM\"\n").unwrap();
        let config = SimConfig::from_file(&path).unwrap();
        assert_eq!(config.driver, "HAM");
    }
}
