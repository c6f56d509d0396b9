//! Tests for the normalization pass: combination policies, row filtering,
//! and calendar-day deduplication

use crate::app::models::{DerivedField, FieldId};
use crate::app::services::header_resolver::HeaderResolver;
use crate::app::services::row_normalizer::{Combine, DayDedup, RowNormalizer, combine_policy};
use crate::app::services::sheet_reader::{Cell, RawSheet};
use crate::config::RatesConfig;
use chrono::NaiveDate;

fn normalizer() -> RowNormalizer {
    RowNormalizer::new(HeaderResolver::from_rates(&RatesConfig::default()))
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

fn sheet(headers: &[&str], rows: Vec<Vec<Cell>>) -> RawSheet {
    RawSheet {
        name: "test".to_string(),
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).unwrap()
}

#[test]
fn test_basic_normalization() {
    let sheet = sheet(
        &[
            "Дата",
            "Спенд ФБ",
            "Приход",
            "Приход USDT",
            "Кол-во ФД",
            "Сумма ФД",
        ],
        vec![vec![
            text("05.01.2024"),
            text("100"),
            text("365"),
            text("100"),
            text("7"),
            text("50"),
        ]],
    );

    let mut dedup = DayDedup::new();
    let outcome = normalizer().normalize(&sheet, &mut dedup);

    assert_eq!(outcome.rows.len(), 1);
    let row = &outcome.rows[0];
    assert_eq!(row.date, day(2024, 1, 5));
    assert_eq!(row.spend.get("facebook"), Some(&100.0));
    assert_eq!(row.own_revenue_local, 365.0);
    assert_eq!(row.own_revenue_settled, 100.0);
    assert_eq!(row.first_deposit_count, 7);
    assert_eq!(row.first_deposit_sum_local, 50.0);
    assert_eq!(outcome.stats.produced, 1);
}

#[test]
fn test_blank_first_cell_skips_row() {
    let sheet = sheet(
        &["Дата", "Приход"],
        vec![
            vec![Cell::Empty, text("100")],
            vec![text(""), text("200")],
            vec![text("05.01.2024"), text("300")],
        ],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.stats.blank_rows, 2);
}

#[test]
fn test_totals_row_skipped() {
    let sheet = sheet(
        &["Дата", "Приход"],
        vec![
            vec![text("05.01.2024"), text("300")],
            vec![text("Итого"), text("300")],
            vec![text("Total:"), text("300")],
        ],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.stats.totals_rows, 2);
}

#[test]
fn test_undated_row_dropped() {
    let sheet = sheet(
        &["Дата", "Приход"],
        vec![vec![text("не дата"), text("300")]],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.stats.undated_rows, 1);
}

#[test]
fn test_all_zero_row_dropped() {
    let sheet = sheet(
        &["Дата", "Спенд ФБ", "Приход"],
        vec![vec![text("05.01.2024"), text("0"), text("")]],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.stats.empty_rows, 1);
}

#[test]
fn test_duplicate_day_first_row_wins() {
    // Same calendar day, different values: the first row survives untouched
    let sheet = sheet(
        &["Дата", "Приход"],
        vec![
            vec![text("05.01.2024"), text("100")],
            vec![text("05.01.2024"), text("999")],
        ],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].own_revenue_local, 100.0);
    assert_eq!(outcome.stats.duplicate_days, 1);
}

#[test]
fn test_dedup_state_spans_calls_within_a_batch() {
    let first = sheet(
        &["Дата", "Приход"],
        vec![vec![text("05.01.2024"), text("100")]],
    );
    let second = sheet(
        &["Дата", "Приход"],
        vec![
            vec![text("05.01.2024"), text("999")],
            vec![text("06.01.2024"), text("50")],
        ],
    );

    let mut dedup = DayDedup::new();
    let n = normalizer();
    let outcome1 = n.normalize(&first, &mut dedup);
    let outcome2 = n.normalize(&second, &mut dedup);

    assert_eq!(outcome1.rows.len(), 1);
    assert_eq!(outcome2.rows.len(), 1);
    assert_eq!(outcome2.rows[0].date, day(2024, 1, 6));
    assert_eq!(outcome2.stats.duplicate_days, 1);
    assert_eq!(dedup.len(), 2);
}

#[test]
fn test_split_revenue_columns_are_summed() {
    let sheet = sheet(
        &["Дата", "P2P USDT (карта)", "P2P USDT (счет)"],
        vec![vec![text("05.01.2024"), text("60"), text("40")]],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert_eq!(outcome.rows[0].settlement_revenue_settled, 100.0);
}

#[test]
fn test_duplicate_count_columns_take_maximum() {
    let sheet = sheet(
        &["Дата", "Кол-во ФД", "FD count", "Приход"],
        vec![vec![text("05.01.2024"), text("5"), text("3"), text("10")]],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert_eq!(outcome.rows[0].first_deposit_count, 5);
}

#[test]
fn test_duplicate_scalar_columns_last_write_wins() {
    let sheet = sheet(
        &["Дата", "Спенд ФБ", "Facebook"],
        vec![vec![text("05.01.2024"), text("100"), text("80")]],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert_eq!(outcome.rows[0].spend.get("facebook"), Some(&80.0));
}

#[test]
fn test_precomputed_columns_captured() {
    let sheet = sheet(
        &["Дата", "Приход", "Профит", "ROI"],
        vec![vec![text("05.01.2024"), text("100"), text("42.5"), text("0")]],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    let row = &outcome.rows[0];
    assert_eq!(row.precomputed.get(&DerivedField::NetProfit), Some(&42.5));
    assert_eq!(row.precomputed.get(&DerivedField::Roi), Some(&0.0));
}

#[test]
fn test_normalization_is_idempotent() {
    let sheet = sheet(
        &["Дата", "Спенд ФБ", "Приход", "Кол-во ФД"],
        vec![
            vec![text("05.01.2024"), text("100"), text("365"), text("7")],
            vec![text("06.01.2024"), text("90"), text("300"), text("4")],
        ],
    );

    let n = normalizer();
    let first = n.normalize(&sheet, &mut DayDedup::new());
    let second = n.normalize(&sheet, &mut DayDedup::new());
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_combine_policies() {
    assert_eq!(
        combine_policy(&FieldId::SettlementRevenueSettled),
        Combine::Sum
    );
    assert_eq!(combine_policy(&FieldId::FirstDepositSumLocal), Combine::Sum);
    assert_eq!(combine_policy(&FieldId::FirstDepositCount), Combine::Max);
    assert_eq!(
        combine_policy(&FieldId::Spend("facebook".to_string())),
        Combine::Replace
    );
    assert_eq!(
        combine_policy(&FieldId::OtherCost("misc".to_string())),
        Combine::Replace
    );
    assert_eq!(
        combine_policy(&FieldId::Precomputed(DerivedField::RepeatDepositSumLocal)),
        Combine::Sum
    );
    assert_eq!(
        combine_policy(&FieldId::Precomputed(DerivedField::NetProfit)),
        Combine::Replace
    );
}

#[test]
fn test_short_rows_tolerated() {
    // Row narrower than the header; missing cells read as empty
    let sheet = sheet(
        &["Дата", "Спенд ФБ", "Приход"],
        vec![vec![text("05.01.2024"), text("100")]],
    );

    let outcome = normalizer().normalize(&sheet, &mut DayDedup::new());
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.rows[0].own_revenue_local, 0.0);
}
