//! Row normalization for heterogeneous report sheets
//!
//! Consumes a raw sheet, resolves its header row once, and turns data rows
//! into canonical rows:
//! - values are typed through [`field_parsers`]
//! - columns hitting the same field combine under a per-field policy
//!   (sum, max, or last-write-wins)
//! - blank rows, embedded totals rows, undated rows, and all-zero rows are
//!   dropped
//! - one row survives per calendar day, first occurrence winning, with the
//!   dedup state passed in explicitly per batch ([`deduplication`])
//!
//! Matched values are collected into an accumulator keyed by field first;
//! the immutable [`CanonicalRow`] is constructed in a single step afterwards.

pub mod deduplication;
pub mod field_parsers;

#[cfg(test)]
pub mod tests;

use crate::app::models::{CanonicalRow, FieldId};
use crate::app::services::header_resolver::{HeaderResolver, normalize_label};
use crate::app::services::sheet_reader::{Cell, RawSheet};
use crate::constants::is_totals_marker;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

pub use deduplication::DayDedup;

/// How repeated column hits for one field combine within a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// Add all matched values; for amounts legitimately split across
    /// sub-category columns
    Sum,
    /// Keep the largest value; duplicate count columns repeat the same
    /// measurement rather than adding to it
    Max,
    /// Later columns overwrite earlier ones
    Replace,
}

/// Combination policy for a field
pub fn combine_policy(field: &FieldId) -> Combine {
    use crate::app::models::DerivedField::{RepeatDepositSumLocal, RepeatDepositSumSettled};
    match field {
        FieldId::SettlementRevenueLocal
        | FieldId::SettlementRevenueSettled
        | FieldId::OwnRevenueLocal
        | FieldId::OwnRevenueSettled
        | FieldId::FirstDepositSumLocal => Combine::Sum,
        FieldId::Precomputed(RepeatDepositSumLocal)
        | FieldId::Precomputed(RepeatDepositSumSettled) => Combine::Sum,
        FieldId::FirstDepositCount => Combine::Max,
        _ => Combine::Replace,
    }
}

/// Counters for one normalization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeStats {
    pub rows_seen: usize,
    pub blank_rows: usize,
    pub totals_rows: usize,
    pub undated_rows: usize,
    pub empty_rows: usize,
    pub duplicate_days: usize,
    pub produced: usize,
}

/// Result of normalizing one sheet
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub rows: Vec<CanonicalRow>,
    pub stats: NormalizeStats,
}

/// Normalizes raw sheets into canonical rows
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    resolver: HeaderResolver,
}

impl RowNormalizer {
    pub fn new(resolver: HeaderResolver) -> Self {
        Self { resolver }
    }

    /// Normalize one sheet. `dedup` carries the days already produced in this
    /// batch and is updated in place.
    pub fn normalize(&self, sheet: &RawSheet, dedup: &mut DayDedup) -> NormalizeOutcome {
        let columns = self.resolver.resolve_headers(&sheet.headers);
        let matched = columns.iter().filter(|c| c.is_some()).count();
        debug!(
            "Sheet '{}': resolved {} of {} header columns",
            sheet.name,
            matched,
            columns.len()
        );

        let mut stats = NormalizeStats::default();
        let mut rows = Vec::new();

        for raw_row in &sheet.rows {
            stats.rows_seen += 1;

            let first = raw_row.first().cloned().unwrap_or(Cell::Empty);
            if first.is_blank() {
                stats.blank_rows += 1;
                continue;
            }
            if is_totals_marker(&normalize_label(&first.as_label())) {
                stats.totals_rows += 1;
                continue;
            }

            let (date, values) = collect_row(&columns, raw_row);

            let Some(date) = date else {
                stats.undated_rows += 1;
                continue;
            };

            let row = build_row(date, values);
            if row.is_empty() {
                stats.empty_rows += 1;
                continue;
            }

            if !dedup.observe(date) {
                stats.duplicate_days += 1;
                continue;
            }

            rows.push(row);
        }

        stats.produced = rows.len();
        NormalizeOutcome { rows, stats }
    }
}

/// Walk one raw row and fold matched cells into an accumulator keyed by field
fn collect_row(
    columns: &[Option<FieldId>],
    raw_row: &[Cell],
) -> (Option<NaiveDate>, BTreeMap<FieldId, f64>) {
    let mut date: Option<NaiveDate> = None;
    let mut values: BTreeMap<FieldId, f64> = BTreeMap::new();

    for (index, field) in columns.iter().enumerate() {
        let Some(field) = field else { continue };
        let cell = raw_row.get(index).unwrap_or(&Cell::Empty);

        if *field == FieldId::Date {
            if date.is_none() {
                date = field_parsers::parse_date(cell);
            }
            continue;
        }

        let value = match field {
            FieldId::FirstDepositCount => field_parsers::parse_count(cell) as f64,
            _ => field_parsers::parse_decimal(cell),
        };

        match combine_policy(field) {
            Combine::Sum => {
                *values.entry(field.clone()).or_insert(0.0) += value;
            }
            Combine::Max => {
                let entry = values.entry(field.clone()).or_insert(0.0);
                if value > *entry {
                    *entry = value;
                }
            }
            Combine::Replace => {
                values.insert(field.clone(), value);
            }
        }
    }

    (date, values)
}

/// Construct the immutable canonical row from the accumulated values
fn build_row(date: NaiveDate, values: BTreeMap<FieldId, f64>) -> CanonicalRow {
    let mut row = CanonicalRow::empty(date);

    for (field, value) in values {
        match field {
            FieldId::Date => {}
            FieldId::Spend(channel) => {
                row.spend.insert(channel, value);
            }
            FieldId::SettlementRevenueLocal => row.settlement_revenue_local = value,
            FieldId::SettlementRevenueSettled => row.settlement_revenue_settled = value,
            FieldId::OwnRevenueLocal => row.own_revenue_local = value,
            FieldId::OwnRevenueSettled => row.own_revenue_settled = value,
            FieldId::FirstDepositCount => row.first_deposit_count = value.round() as u32,
            FieldId::FirstDepositSumLocal => row.first_deposit_sum_local = value,
            FieldId::OtherCost(name) => {
                row.other_costs.insert(name, value);
            }
            FieldId::Precomputed(metric) => {
                row.precomputed.insert(metric, value);
            }
        }
    }

    row
}
