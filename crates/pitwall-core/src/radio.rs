//! Scripted team-radio chatter shown between strategy discussions.
//!
//! These exchanges are canned flavor text, not generator output: they are
//! selected deterministically by lap so a re-render of the same lap shows
//! the same exchange.

/// One engineer/driver exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioExchange {
    pub engineer: String,
    pub driver: String,
}

const EARLY_RACE: &[(&str, &str)] = &[
    ("How are the tires feeling?", "Good grip, car feels balanced."),
    ("Keep pushing, you're doing great.", "Copy that, staying focused."),
    ("Traffic ahead in sector 2.", "Understood, I see them."),
    ("DRS available next lap.", "Perfect, I'll use it on the main straight."),
    ("Your sector times are strong.", "The car is responding well today."),
];

const MID_RACE: &[(&str, &str)] = &[
    (
        "Tire degradation looking normal.",
        "Starting to feel some sliding in the rear.",
    ),
    (
        "Gap to car behind is 3.2 seconds.",
        "Roger, keeping an eye on mirrors.",
    ),
    ("Weather radar shows clear skies.", "Good, let's stick to the plan."),
    ("Your lap times are consistent.", "Yeah, finding a good rhythm here."),
    ("Pit window opens in 8 laps.", "Copy, let me know when to push."),
];

const LATE_RACE: &[(&str, &str)] = &[
    ("15 laps remaining, stay focused.", "Understood, giving it everything."),
    ("Tires are holding up well.", "Still got some grip left."),
    (
        "P{} car is 2 seconds behind.",
        "I can see him, defending position.",
    ),
    ("Great job managing the tires.", "Thanks, let's bring it home."),
    ("Final 10 laps, keep it clean.", "Copy that, staying concentrated."),
];

/// Returns the scripted exchange for a lap, if this lap carries one.
///
/// Exchanges appear on laps where `lap % 10` is 0, 3, or 7, picked from
/// the early/mid/late pool by race progress. The `{}` placeholder in an
/// engineer line is replaced by the position of the car behind.
pub fn radio_exchange_for_lap(
    lap: u32,
    total_laps: u32,
    driver_position: u32,
) -> Option<RadioExchange> {
    if !matches!(lap % 10, 0 | 3 | 7) {
        return None;
    }

    let total = total_laps.max(1);
    let progress = f64::from(lap) / f64::from(total);
    let pool = if progress < 0.33 {
        EARLY_RACE
    } else if progress < 0.66 {
        MID_RACE
    } else {
        LATE_RACE
    };

    let (engineer, driver) = pool[(lap as usize) % pool.len()];
    let engineer = if engineer.contains("{}") {
        engineer.replace("{}", &(driver_position + 1).to_string())
    } else {
        engineer.to_string()
    };

    Some(RadioExchange {
        engineer,
        driver: driver.to_string(),
    })
}
