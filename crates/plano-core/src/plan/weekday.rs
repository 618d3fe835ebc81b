//! Portuguese weekday names
//!
//! Index convention used throughout the schedule: 0 = Sunday … 6 = Saturday.

use chrono::Weekday;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::fold_lower;

/// `segunda-feira`, `terça feira`, `QUARTA-FEIRA` anywhere in the text
static FEIRA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(segunda|terca|quarta|quinta|sexta)[\s-]*feira\b").unwrap()
});

/// Weekend names need no suffix
static WEEKEND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(sabado|domingo)\b").unwrap());

/// Bare weekday name at the start of a label: "Segunda", "Quarta - Treino B".
/// Only at the start, "segunda fase" must not read as Monday.
static BARE_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:dia\s+\d{1,2}\s*[-–:]\s*)?(segunda|terca|quarta|quinta|sexta)\s*(?:$|[-–:(|,])")
        .unwrap()
});

/// A whole line that is nothing more than a day label, optionally followed by
/// a short separator tail ("Segunda-feira:", "SÁBADO - descanso").
static DAY_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:dia\s+\d{1,2}\s*[-–:]\s*)?(segunda|terca|quarta|quinta|sexta|sabado|domingo)(?:[\s-]*feira)?\s*(?:$|[-–:(|])",
    )
    .unwrap()
});

fn from_folded_name(name: &str) -> Option<Weekday> {
    match name {
        "domingo" => Some(Weekday::Sun),
        "segunda" => Some(Weekday::Mon),
        "terca" => Some(Weekday::Tue),
        "quarta" => Some(Weekday::Wed),
        "quinta" => Some(Weekday::Thu),
        "sexta" => Some(Weekday::Fri),
        "sabado" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Find a Portuguese weekday name in free text (titles, labels).
pub fn detect_weekday(text: &str) -> Option<Weekday> {
    let folded = fold_lower(text);
    let folded = folded.trim_matches(|c: char| !c.is_alphanumeric());
    [&*FEIRA_RE, &*WEEKEND_RE, &*BARE_DAY_RE]
        .iter()
        .find_map(|re| re.captures(folded))
        .and_then(|caps| caps.get(1))
        .and_then(|m| from_folded_name(m.as_str()))
}

/// Parse a line that *is* a day label (used to open day groups inside a
/// section). Stricter than [`detect_weekday`]: the day must lead the line.
pub fn parse_day_heading(text: &str) -> Option<Weekday> {
    let folded = fold_lower(text);
    let folded = folded.trim_matches(|c: char| !c.is_alphanumeric());
    if folded.chars().count() > 48 {
        return None;
    }
    DAY_HEADING_RE
        .captures(folded)
        .and_then(|caps| caps.get(1))
        .and_then(|m| from_folded_name(m.as_str()))
}

/// Weekday for a schedule index; wraps modulo 7.
pub fn from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

pub fn to_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

pub fn portuguese_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Domingo",
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
    }
}
