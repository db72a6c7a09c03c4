use chrono::{DateTime, Datelike, Local};

/// Calendar months that must pass before the checklist is offered a reset.
pub const RESET_INTERVAL_MONTHS: i32 = 2;

/// Whole calendar months between two instants. The day of month is ignored,
/// so Jan 31 to Feb 1 counts as one month.
pub fn months_between(earlier: DateTime<Local>, later: DateTime<Local>) -> i32 {
    (later.year() - earlier.year()) * 12 + (later.month() as i32 - earlier.month() as i32)
}

pub fn is_reset_due(last_reset: Option<DateTime<Local>>, now: DateTime<Local>) -> bool {
    match last_reset {
        Some(last) => months_between(last, now) >= RESET_INTERVAL_MONTHS,
        None => false,
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|value| value.with_timezone(&Local))
}

pub fn format_timestamp(value: DateTime<Local>) -> String {
    value.to_rfc3339()
}

/// de-DE style, e.g. "17.10.2026, 14:05".
pub fn display_timestamp(value: DateTime<Local>) -> String {
    value.format("%d.%m.%Y, %H:%M").to_string()
}
