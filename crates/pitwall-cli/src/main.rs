//! # pitwall-cli
//!
//! Binary entry point for the Pit Wall simulator.
//!
//! This crate provides:
//! - CLI argument parsing using `clap`
//! - Application initialization and configuration
//! - The interactive lap-playback loop on the terminal
//! - Session fixture listing via `pitwall sessions`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pitwall_adapters::build_generator;
use pitwall_core::{JsonSessionProvider, SessionData, SessionProvider, SimConfig, Simulation, TickOutcome};
use pitwall_proto::{Plan, StrategyLogEntry};
use std::io::{stdout, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

mod render;

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Automatically detect if stdout is a TTY
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    /// Returns true if colors should be used based on mode and terminal detection.
    fn should_use_colors(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stdout().is_terminal(),
        }
    }
}

/// Pit Wall - replayed race-strategy simulation on your terminal
#[derive(Parser, Debug)]
#[command(name = "pitwall", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, default_value = "pitwall.yml", global = true)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output mode (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a session (default if no subcommand given)
    Run(RunArgs),

    /// List the session fixtures available in the data directory
    Sessions(SessionsArgs),
}

/// Arguments for the run subcommand.
#[derive(Parser, Debug, Default)]
struct RunArgs {
    /// Driver code to manage (e.g. HAM)
    #[arg(short, long)]
    driver: Option<String>,

    /// Season year of the session
    #[arg(long)]
    year: Option<u16>,

    /// Race name (e.g. "Bahrain")
    #[arg(long)]
    race: Option<String>,

    /// Session kind token ("R" for the race)
    #[arg(long)]
    session_kind: Option<String>,

    /// Directory holding session fixtures
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Generator backend override (scripted, http)
    #[arg(long)]
    backend: Option<String>,

    /// Delay between laps in milliseconds
    #[arg(long)]
    lap_delay_ms: Option<u64>,

    /// Disable playback pacing entirely
    #[arg(long, conflicts_with = "lap_delay_ms")]
    no_delay: bool,

    /// Answer every strategy call with Plan A instead of prompting
    #[arg(long)]
    auto: bool,

    /// Write the strategy log as JSON lines after the run
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Arguments for the sessions subcommand.
#[derive(Parser, Debug)]
struct SessionsArgs {
    /// Directory holding session fixtures
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Some(Commands::Run(args)) => run_command(cli.config, cli.color, args),
        Some(Commands::Sessions(args)) => sessions_command(cli.config, args),
        None => run_command(cli.config, cli.color, RunArgs::default()),
    }
}

fn load_config(config_path: &PathBuf) -> Result<SimConfig> {
    if config_path.exists() {
        SimConfig::from_file(config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))
    } else {
        warn!(
            "config file {} not found, using defaults",
            config_path.display()
        );
        Ok(SimConfig::default())
    }
}

fn run_command(config_path: PathBuf, color_mode: ColorMode, args: RunArgs) -> Result<()> {
    let mut config = load_config(&config_path)?;

    // CLI overrides take precedence over the config file.
    if let Some(year) = args.year {
        config.session.year = year;
    }
    if let Some(race) = args.race {
        config.session.race = race;
    }
    if let Some(kind) = args.session_kind {
        config.session.kind = kind;
    }
    if let Some(dir) = args.data_dir {
        config.session.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(driver) = args.driver {
        config.driver = driver;
    }
    if let Some(backend) = args.backend {
        config.generator.backend = backend;
    }
    if let Some(delay) = args.lap_delay_ms {
        config.playback.lap_delay_ms = delay;
    }
    if args.no_delay {
        config.playback.lap_delay_ms = 0;
    }
    config.validate().context("invalid configuration")?;

    let provider = JsonSessionProvider::new(&config.session.data_dir);
    let session = provider
        .load(config.session.year, &config.session.race, &config.session.kind)
        .context("could not load session data")?;
    let driver = resolve_driver(&config, &session)?;
    let generator = build_generator(&config.generator)?;

    info!(
        year = config.session.year,
        race = %config.session.race,
        driver = %driver,
        "starting replay"
    );

    let use_colors = color_mode.should_use_colors();
    let delay = Duration::from_millis(config.playback.lap_delay_ms);
    let mut sim = Simulation::new(session, driver, generator);

    let progress = ProgressBar::new(u64::from(sim.session().total_laps()));
    progress.set_style(
        ProgressStyle::with_template("{bar:30} lap {pos}/{len}")
            .context("progress bar template")?,
    );

    loop {
        match sim.tick() {
            TickOutcome::Dashboard {
                view,
                radio,
                triggers,
            } => {
                progress.set_position(u64::from(view.lap));
                let opened_discussion = !triggers.is_empty();
                progress.suspend(|| {
                    render::dashboard(&view, radio.as_ref(), &triggers, use_colors);
                });
                // Pacing applies to plain playback laps only.
                if !opened_discussion && !delay.is_zero() {
                    std::thread::sleep(delay);
                }
            }
            TickOutcome::AwaitingChoice { discussion } => {
                progress.suspend(|| render::discussion(&discussion, use_colors));
                let plan = if args.auto {
                    Plan::A
                } else {
                    progress.suspend(prompt_for_plan)?
                };
                sim.choose(plan);
            }
            TickOutcome::Outcome {
                choice,
                matched_history,
                paragraphs,
            } => {
                progress.suspend(|| {
                    render::outcome(choice, matched_history, &paragraphs, use_colors);
                });
                if !args.auto {
                    progress.suspend(wait_for_enter)?;
                }
                sim.confirm_outcome();
            }
            TickOutcome::Finished => break,
        }
    }
    progress.finish_and_clear();

    render::summary(sim.state().strategy_log(), use_colors);
    if let Some(path) = args.log_file {
        export_log(&path, sim.state().strategy_log())
            .with_context(|| format!("failed to write strategy log to {}", path.display()))?;
        info!("strategy log written to {}", path.display());
    }
    Ok(())
}

fn sessions_command(config_path: PathBuf, args: SessionsArgs) -> Result<()> {
    let config = load_config(&config_path)?;
    let dir = args
        .data_dir
        .map_or(config.session.data_dir, |d| d.to_string_lossy().to_string());
    let provider = JsonSessionProvider::new(&dir);

    let fixtures = provider.available();
    if fixtures.is_empty() {
        println!("No session fixtures found in {dir}");
        return Ok(());
    }
    for name in fixtures {
        println!("{name}");
    }
    Ok(())
}

/// Picks the managed driver: explicit configuration first, then the
/// session's results metadata, then the first driver with lap data.
fn resolve_driver(config: &SimConfig, session: &SessionData) -> Result<String> {
    if !config.driver.is_empty() {
        return Ok(config.driver.clone());
    }
    if let Some(info) = session.drivers().first() {
        return Ok(info.code.clone());
    }
    if let Some(record) = session.laps_for(1).first() {
        return Ok(record.driver.clone());
    }
    bail!("session contains no drivers")
}

/// Parses a plan choice token; empty or unrecognized input is rejected.
fn parse_plan(input: &str) -> Option<Plan> {
    match input.trim().to_lowercase().as_str() {
        "a" | "plan a" => Some(Plan::A),
        "b" | "plan b" => Some(Plan::B),
        _ => None,
    }
}

fn prompt_for_plan() -> Result<Plan> {
    let stdin = std::io::stdin();
    loop {
        print!("Your call, Team Principal [A/B]: ");
        stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // Stdin closed; fall back to the historical branch.
            warn!("stdin closed, defaulting to Plan A");
            return Ok(Plan::A);
        }
        if let Some(plan) = parse_plan(&line) {
            return Ok(plan);
        }
        println!("Please answer A or B.");
    }
}

fn wait_for_enter() -> Result<()> {
    print!("Press Enter to resume the race...");
    stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

/// Writes the strategy log as one JSON object per line.
fn export_log(path: &std::path::Path, log: &[StrategyLogEntry]) -> Result<()> {
    let mut out = String::new();
    for entry in log {
        out.push_str(&serde_json::to_string(entry)?);
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_tokens_parse_case_insensitively() {
        assert_eq!(parse_plan("a"), Some(Plan::A));
        assert_eq!(parse_plan("  B \n"), Some(Plan::B));
        assert_eq!(parse_plan("Plan A"), Some(Plan::A));
        assert_eq!(parse_plan("c"), None);
        assert_eq!(parse_plan(""), None);
    }

    #[test]
    fn exported_log_is_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strategy.jsonl");
        let log = vec![
            StrategyLogEntry::new(10, Plan::A),
            StrategyLogEntry::new(20, Plan::B),
        ];
        export_log(&path, &log).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["lap"], 10);
        assert_eq!(first["plan"], "A");
    }

    #[test]
    fn driver_resolution_falls_back_to_lap_data() {
        use pitwall_proto::{Compound, LapRecord, SessionMeta, TrackStatus};

        let laps = vec![LapRecord {
            lap: 1,
            driver: "VER".to_string(),
            position: Some(1),
            compound: Compound::Medium,
            tyre_age: Some(1),
            lap_time: None,
            lap_start: Duration::ZERO,
            track_status: TrackStatus::Clear,
            pit_in: None,
            pit_out: None,
        }];
        let session = SessionData::new(
            SessionMeta {
                year: 2023,
                race: "Bahrain".to_string(),
                kind: "R".to_string(),
                event_date: None,
                total_laps: 1,
                drivers: Vec::new(),
            },
            laps,
            Vec::new(),
        );
        let config = SimConfig::default();
        assert_eq!(resolve_driver(&config, &session).unwrap(), "VER");
    }
}
