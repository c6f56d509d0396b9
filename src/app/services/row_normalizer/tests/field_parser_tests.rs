//! Tests for date, decimal, and count parsing

use crate::app::services::row_normalizer::field_parsers::{
    parse_count, parse_date, parse_decimal, parse_decimal_str, serial_to_date,
};
use crate::app::services::sheet_reader::Cell;
use chrono::NaiveDate;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_serial_epoch_semantics() {
    // 45292 is 2024-01-01 in every mainstream spreadsheet
    assert_eq!(serial_to_date(45292.0), Some(date(2024, 1, 1)));
    // Serial 61 must land on 1900-03-01; the epoch offset absorbs the
    // historical phantom leap day
    assert_eq!(serial_to_date(61.0), Some(date(1900, 3, 1)));
}

#[test]
fn test_serial_fractional_time_ignored() {
    assert_eq!(serial_to_date(45292.75), Some(date(2024, 1, 1)));
}

#[test]
fn test_serial_out_of_range() {
    assert_eq!(serial_to_date(0.5), None);
    assert_eq!(serial_to_date(-3.0), None);
    assert_eq!(serial_to_date(1_000_000.0), None);
}

#[test]
fn test_parse_date_native_and_numeric() {
    assert_eq!(
        parse_date(&Cell::Date(date(2024, 1, 5))),
        Some(date(2024, 1, 5))
    );
    assert_eq!(parse_date(&Cell::Number(45292.0)), Some(date(2024, 1, 1)));
}

#[test]
fn test_parse_date_text_representations() {
    // Serial carried as text is tried before string formats
    assert_eq!(
        parse_date(&Cell::Text("45292".to_string())),
        Some(date(2024, 1, 1))
    );
    assert_eq!(
        parse_date(&Cell::Text("2024-01-05".to_string())),
        Some(date(2024, 1, 5))
    );
    assert_eq!(
        parse_date(&Cell::Text("05.01.2024".to_string())),
        Some(date(2024, 1, 5))
    );
    assert_eq!(
        parse_date(&Cell::Text("05/01/2024".to_string())),
        Some(date(2024, 1, 5))
    );
    assert_eq!(
        parse_date(&Cell::Text("05-01-2024".to_string())),
        Some(date(2024, 1, 5))
    );
}

#[test]
fn test_parse_date_tolerates_time_suffix() {
    assert_eq!(
        parse_date(&Cell::Text("05.01.2024 14:30".to_string())),
        Some(date(2024, 1, 5))
    );
    assert_eq!(
        parse_date(&Cell::Text("2024-01-05T00:00:00".to_string())),
        Some(date(2024, 1, 5))
    );
}

#[test]
fn test_parse_date_failures() {
    assert_eq!(parse_date(&Cell::Empty), None);
    assert_eq!(parse_date(&Cell::Text("итого".to_string())), None);
    assert_eq!(parse_date(&Cell::Text("".to_string())), None);
    assert_eq!(parse_date(&Cell::Bool(true)), None);
}

#[test]
fn test_decimal_locale_punctuation() {
    assert_eq!(parse_decimal_str("1 234,56"), 1234.56);
    assert_eq!(parse_decimal_str("1,234.56"), 1234.56);
    assert_eq!(parse_decimal_str("12 500"), 12500.0);
    assert_eq!(parse_decimal_str("$ 1,200.50"), 1200.50);
    assert_eq!(parse_decimal_str("-35,5"), -35.5);
    assert_eq!(parse_decimal_str("365"), 365.0);
}

#[test]
fn test_decimal_missing_is_zero() {
    assert_eq!(parse_decimal_str(""), 0.0);
    assert_eq!(parse_decimal_str("n/a"), 0.0);
    assert_eq!(parse_decimal_str("-"), 0.0);
    assert_eq!(parse_decimal(&Cell::Empty), 0.0);
    assert_eq!(parse_decimal(&Cell::Text("  ".to_string())), 0.0);
}

#[test]
fn test_decimal_from_typed_cells() {
    assert_eq!(parse_decimal(&Cell::Number(9.5)), 9.5);
    assert_eq!(parse_decimal(&Cell::Bool(true)), 0.0);
}

#[test]
fn test_count_rounds_to_nearest() {
    assert_eq!(parse_count(&Cell::Text("7".to_string())), 7);
    assert_eq!(parse_count(&Cell::Number(6.7)), 7);
    assert_eq!(parse_count(&Cell::Number(4.4)), 4);
}

#[test]
fn test_count_never_negative() {
    assert_eq!(parse_count(&Cell::Text("-3".to_string())), 0);
    assert_eq!(parse_count(&Cell::Empty), 0);
}
