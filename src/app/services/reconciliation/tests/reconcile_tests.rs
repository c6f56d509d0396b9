//! Tests for source-precedence reconciliation and (date, country) upserts

use crate::app::models::{CanonicalRow, DerivedField, DerivedRecord, SheetContext};
use crate::app::services::metrics_engine::MetricsEngine;
use crate::app::services::reconciliation::{
    MemoryStore, MetricsStore, ReconciliationService, reconcile,
};
use crate::config::RatesConfig;
use chrono::NaiveDate;
use std::sync::Arc;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn sample_row() -> CanonicalRow {
    let mut row = CanonicalRow::empty(day(5));
    row.spend.insert("facebook".to_string(), 100.0);
    row.own_revenue_local = 365.0;
    row.own_revenue_settled = 100.0;
    row.first_deposit_count = 7;
    row.first_deposit_sum_local = 50.0;
    row
}

fn derive(row: &CanonicalRow) -> DerivedRecord {
    MetricsEngine::new(RatesConfig::default()).derive(row, &SheetContext::new("PE"))
}

#[test]
fn test_nonzero_precomputed_wins() {
    let mut row = sample_row();
    row.precomputed.insert(DerivedField::NetProfit, 123.45);
    row.precomputed.insert(DerivedField::AgencyFee, 11.0);

    let engine_record = derive(&row);
    assert_ne!(engine_record.net_profit, 123.45);

    let reconciled = reconcile(&row, engine_record);
    assert_eq!(reconciled.net_profit, 123.45);
    assert_eq!(reconciled.agency_fee, 11.0);
}

#[test]
fn test_zero_precomputed_is_treated_as_absent() {
    let mut row = sample_row();
    row.precomputed.insert(DerivedField::NetProfit, 0.0);

    let engine_record = derive(&row);
    let engine_profit = engine_record.net_profit;

    let reconciled = reconcile(&row, engine_record);
    assert_eq!(reconciled.net_profit, engine_profit);
}

#[test]
fn test_fields_without_precomputed_keep_engine_values() {
    let row = sample_row();
    let engine_record = derive(&row);
    let reconciled = reconcile(&row, engine_record.clone());
    assert_eq!(reconciled, engine_record);
}

#[test]
fn test_upsert_keyed_by_date_and_country() {
    let store = Arc::new(MemoryStore::new());
    let service = ReconciliationService::new(store.clone());

    let row = sample_row();
    service.persist(&row, derive(&row)).unwrap();

    let mut other_day = sample_row();
    other_day.date = day(6);
    service.persist(&other_day, derive(&other_day)).unwrap();

    assert_eq!(store.len(), 2);
    let found = store.find_by_date_and_country(day(5), "PE").unwrap();
    assert!(found.is_some());
    assert!(
        store
            .find_by_date_and_country(day(5), "IN")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_upsert_fully_overwrites_existing_record() {
    let store = Arc::new(MemoryStore::new());
    let service = ReconciliationService::new(store.clone());

    let row = sample_row();
    service.persist(&row, derive(&row)).unwrap();

    let mut updated = sample_row();
    updated.own_revenue_settled = 250.0;
    updated.own_revenue_local = 500.0;
    service.persist(&updated, derive(&updated)).unwrap();

    assert_eq!(store.len(), 1);
    let stored = store
        .find_by_date_and_country(day(5), "PE")
        .unwrap()
        .unwrap();
    assert_eq!(stored.own_revenue_settled, 250.0);
}

#[test]
fn test_reingestion_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let service = ReconciliationService::new(store.clone());

    let row = sample_row();
    service.persist(&row, derive(&row)).unwrap();
    let first = store.records();

    service.persist(&row, derive(&row)).unwrap();
    let second = store.records();

    assert_eq!(first, second);
}
