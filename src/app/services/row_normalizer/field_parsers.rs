//! Value parsing for mixed cell representations
//!
//! Exports carry dates as spreadsheet serials, ISO strings, or `DD.MM.YYYY`
//! family strings, and numbers with locale punctuation. Missing or
//! unparseable numeric cells mean "no activity" and parse to zero; only an
//! unparseable date disqualifies a row, and that decision belongs to the
//! normalizer.

use crate::app::services::sheet_reader::Cell;
use crate::constants::{SERIAL_EPOCH, SERIAL_MAX, SERIAL_MIN, TEXT_DATE_FORMATS};
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

fn sanitizer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.,\-]").expect("static regex"))
}

/// Convert a spreadsheet serial number to a calendar date.
///
/// Day 0 is the fixed epoch from [`SERIAL_EPOCH`]; the conversion is plain
/// day arithmetic from that anchor, so leap years fall where the spreadsheet
/// put them.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(SERIAL_MIN..=SERIAL_MAX).contains(&serial) {
        return None;
    }
    let (year, month, day) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(year, month, day)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Parse a cell as a calendar date.
///
/// Tries, in order: a native date, a numeric serial, an ISO string, then the
/// `DD.MM.YYYY` / `DD/MM/YYYY` / `DD-MM-YYYY` family. Returns `None` when
/// every representation fails.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Number(serial) => serial_to_date(*serial),
        Cell::Text(text) => parse_date_str(text),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

fn parse_date_str(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serial) = trimmed.parse::<f64>() {
        return serial_to_date(serial);
    }

    // A trailing time component is tolerated on any format
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    let date_part = date_part.split('T').next().unwrap_or(date_part);

    TEXT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Parse a cell as a decimal amount; empty and unparseable cells are zero.
pub fn parse_decimal(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => parse_decimal_str(text),
        Cell::Empty | Cell::Date(_) | Cell::Bool(_) => 0.0,
    }
}

/// Parse decimal text tolerant of locale punctuation.
///
/// Everything except digits, separators, and the sign is stripped. A comma
/// acts as the decimal separator only when no dot is present; otherwise
/// commas are thousands grouping and are dropped.
pub fn parse_decimal_str(text: &str) -> f64 {
    let stripped = sanitizer().replace_all(text, "");
    let normalized = if stripped.contains('.') {
        stripped.replace(',', "")
    } else {
        stripped.replace(',', ".")
    };
    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Parse a cell as a count: the decimal value rounded to the nearest
/// non-negative integer.
pub fn parse_count(cell: &Cell) -> u32 {
    let value = parse_decimal(cell).round();
    if value <= 0.0 { 0 } else { value as u32 }
}
