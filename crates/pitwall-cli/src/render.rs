//! Terminal rendering for the lap dashboard, discussions, and outcomes.

use pitwall_core::{DashboardView, Discussion, GapDisplay, RadioExchange};
use pitwall_proto::{Plan, StrategyLogEntry, TriggerReason};

/// ANSI color codes for terminal output.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const MAGENTA: &str = "\x1b[35m";
}

fn paint(text: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("{code}{text}{}", colors::RESET)
    } else {
        text.to_string()
    }
}

/// Prints the normal-playback screen for one lap.
pub fn dashboard(
    view: &DashboardView,
    radio: Option<&RadioExchange>,
    triggers: &[TriggerReason],
    use_colors: bool,
) {
    let header = format!("Lap {}/{}", view.lap, view.total_laps);
    println!("\n{}", paint(&header, colors::BOLD, use_colors));

    let mut conditions = format!("Track: {}", view.track_status);
    if let (Some(air), Some(track)) = (view.air_temp, view.track_temp) {
        conditions.push_str(&format!("  Air {air:.0}C  Surface {track:.0}C"));
    }
    if let Some(kind) = view.interruption {
        conditions.push_str(&format!(
            "  [{}]",
            paint(kind.label(), colors::YELLOW, use_colors)
        ));
    }
    println!("{}", paint(&conditions, colors::DIM, use_colors));

    for row in view.timing.iter().take(10) {
        let age = row
            .tyre_age
            .map_or_else(|| "-".to_string(), |a| a.to_string());
        let interval = row.interval.as_deref().unwrap_or("");
        let compound = row.compound.to_string();
        println!(
            "  P{:<2} {:<4} {:>8} {:<7} age {:<3} {}",
            row.position, row.driver, row.lap_time, compound, age, interval
        );
    }

    let panel = &view.panel;
    println!(
        "  {} {} | {} | {} ({} laps) | deg {:.3}s/lap",
        paint(&panel.driver, colors::CYAN, use_colors),
        panel
            .position
            .map_or_else(|| panel.status.to_string(), |p| format!("P{p}")),
        panel.status,
        panel.compound,
        panel.tyre_age.unwrap_or(0),
        panel.degradation_estimate,
    );
    println!(
        "  Ahead: {}  Behind: {}  Pit loss ~{}s{}",
        panel.ahead,
        panel.behind,
        panel.pit_loss_seconds,
        panel
            .predicted_rejoin
            .map_or_else(String::new, |p| format!("  Rejoin ~P{p}")),
    );
    let temps = panel.tyre_temps;
    println!(
        "  Tyres: FL {:.0}C FR {:.0}C RL {:.0}C RR {:.0}C",
        temps.front_left, temps.front_right, temps.rear_left, temps.rear_right
    );
    if matches!(panel.ahead, GapDisplay::ClearTrack) && panel.position == Some(1) {
        println!("  {}", paint("Leading the race.", colors::GREEN, use_colors));
    }

    if let Some(exchange) = radio {
        println!(
            "  {} {}",
            paint("Engineer:", colors::MAGENTA, use_colors),
            exchange.engineer
        );
        println!(
            "  {} {}",
            paint("Driver:", colors::MAGENTA, use_colors),
            exchange.driver
        );
    }

    if !triggers.is_empty() {
        let reasons = triggers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {} {}",
            paint("STRATEGY CALL:", colors::RED, use_colors),
            reasons
        );
    }
}

/// Prints the pit-crew discussion and the two plan options.
pub fn discussion(discussion: &Discussion, use_colors: bool) {
    println!(
        "\n{}",
        paint("── Pit Wall Discussion ──", colors::BOLD, use_colors)
    );
    for (name, text) in discussion.display_entries() {
        println!("\n{}", paint(&format!("[{name}]"), colors::CYAN, use_colors));
        println!("{text}");
    }
}

/// Prints the decision analysis after a choice.
pub fn outcome(choice: Plan, matched_history: bool, paragraphs: &[String], use_colors: bool) {
    let verdict = if matched_history {
        paint("matches the historical call", colors::GREEN, use_colors)
    } else {
        paint("diverges from the historical call", colors::YELLOW, use_colors)
    };
    println!(
        "\n{} Plan {choice} {verdict}",
        paint("── Decision Analysis ──", colors::BOLD, use_colors)
    );
    for paragraph in paragraphs {
        println!("\n{paragraph}");
    }
}

/// Prints the end-of-run strategy summary.
pub fn summary(log: &[StrategyLogEntry], use_colors: bool) {
    println!("\n{}", paint("── Race Complete ──", colors::BOLD, use_colors));
    if log.is_empty() {
        println!("No strategy decisions were taken.");
        return;
    }
    let historical = log.iter().filter(|e| e.plan.is_historical()).count();
    println!(
        "{} decisions, {historical} matching the historical strategy.",
        log.len()
    );
    for entry in log {
        println!("  lap {:>2}: Plan {}", entry.lap, entry.plan);
    }
}
