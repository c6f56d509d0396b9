//! Data models for report ingestion and metric derivation
//!
//! This module contains the canonical field identifiers, the normalized row
//! type, and the fully derived per-(date, country) record that is persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Canonical Field Identifiers
// =============================================================================

/// A derived financial metric.
///
/// Every variant is a deterministic pure function of the canonical row and the
/// rate configuration. Sources sometimes ship a subset of these pre-computed;
/// those enter the row as `FieldId::Precomputed` values and win at
/// reconciliation when non-zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DerivedField {
    TotalSpend,
    AgencyFee,
    ExchangeRateSettlement,
    CommissionSettlement,
    ExchangeRateOwn,
    TotalRevenueSettled,
    FirstDepositSumSettled,
    RepeatDepositSumLocal,
    RepeatDepositSumSettled,
    HandlerRepeatDepositPay,
    HandlerFirstDepositPay,
    BuyerPay,
    FixedRolePay,
    TotalPayroll,
    TotalExpenses,
    ExpensesExcludingSpend,
    NetProfit,
    Roi,
}

impl DerivedField {
    /// All derived metric fields, in derivation order
    pub const ALL: [DerivedField; 18] = [
        DerivedField::TotalSpend,
        DerivedField::AgencyFee,
        DerivedField::ExchangeRateSettlement,
        DerivedField::CommissionSettlement,
        DerivedField::ExchangeRateOwn,
        DerivedField::TotalRevenueSettled,
        DerivedField::FirstDepositSumSettled,
        DerivedField::RepeatDepositSumLocal,
        DerivedField::RepeatDepositSumSettled,
        DerivedField::HandlerRepeatDepositPay,
        DerivedField::HandlerFirstDepositPay,
        DerivedField::BuyerPay,
        DerivedField::FixedRolePay,
        DerivedField::TotalPayroll,
        DerivedField::TotalExpenses,
        DerivedField::ExpensesExcludingSpend,
        DerivedField::NetProfit,
        DerivedField::Roi,
    ];
}

/// Stable semantic identity of a spreadsheet column, independent of its label.
///
/// A label that resolves to no field is decorative and ignored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    /// Calendar day of the row; the row is discarded without one
    Date,
    /// Spend for one ad channel, keyed by the configured channel name
    Spend(String),
    /// Revenue through the settlement channel, local currency
    SettlementRevenueLocal,
    /// Revenue through the settlement channel, settled currency
    SettlementRevenueSettled,
    /// Directly received revenue, local currency
    OwnRevenueLocal,
    /// Directly received revenue, settled currency
    OwnRevenueSettled,
    /// Number of first deposits
    FirstDepositCount,
    /// Sum of first deposits, local currency
    FirstDepositSumLocal,
    /// Named additional expense (tracker tool, miscellaneous)
    OtherCost(String),
    /// A derived metric the source supplies pre-computed
    Precomputed(DerivedField),
}

// =============================================================================
// Canonical Row
// =============================================================================

/// One spreadsheet data row translated to canonical semantics.
///
/// Immutable once constructed; the normalizer collects raw matched values
/// into an accumulator first and builds the row in a single step.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    pub date: NaiveDate,
    /// Spend per ad channel key
    pub spend: BTreeMap<String, f64>,
    pub settlement_revenue_local: f64,
    pub settlement_revenue_settled: f64,
    pub own_revenue_local: f64,
    pub own_revenue_settled: f64,
    pub first_deposit_count: u32,
    pub first_deposit_sum_local: f64,
    /// Named additional expenses
    pub other_costs: BTreeMap<String, f64>,
    /// Pre-computed metrics carried by the source sheet
    pub precomputed: BTreeMap<DerivedField, f64>,
}

impl CanonicalRow {
    /// Row with the given date and everything else zeroed
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            spend: BTreeMap::new(),
            settlement_revenue_local: 0.0,
            settlement_revenue_settled: 0.0,
            own_revenue_local: 0.0,
            own_revenue_settled: 0.0,
            first_deposit_count: 0,
            first_deposit_sum_local: 0.0,
            other_costs: BTreeMap::new(),
            precomputed: BTreeMap::new(),
        }
    }

    /// Sum of all channel spends
    pub fn total_spend(&self) -> f64 {
        self.spend.values().sum()
    }

    /// Sum of all named additional expenses
    pub fn other_costs_total(&self) -> f64 {
        self.other_costs.values().sum()
    }

    /// True when every monetary and count field is exactly zero.
    ///
    /// A day with no recorded activity is not persisted; this is what
    /// separates "no data collected" from "legitimately zero".
    pub fn is_empty(&self) -> bool {
        self.first_deposit_count == 0
            && self.first_deposit_sum_local == 0.0
            && self.settlement_revenue_local == 0.0
            && self.settlement_revenue_settled == 0.0
            && self.own_revenue_local == 0.0
            && self.own_revenue_settled == 0.0
            && self.spend.values().all(|v| *v == 0.0)
            && self.other_costs.values().all(|v| *v == 0.0)
            && self.precomputed.values().all(|v| *v == 0.0)
    }
}

// =============================================================================
// Sheet Context
// =============================================================================

/// Per-sheet mapping context supplied by the caller alongside the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetContext {
    /// Country identifier; together with the date this keys the stored record
    pub country_id: String,

    /// Local currency code, informational
    pub currency: Option<String>,

    /// Explicit own-revenue exchange rate, used when the rate cannot be
    /// inferred from paired local/settled figures
    pub exchange_rate_override: Option<f64>,
}

impl SheetContext {
    pub fn new(country_id: impl Into<String>) -> Self {
        Self {
            country_id: country_id.into(),
            currency: None,
            exchange_rate_override: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_exchange_rate_override(mut self, rate: f64) -> Self {
        self.exchange_rate_override = Some(rate);
        self
    }
}

// =============================================================================
// Derived Record
// =============================================================================

/// A canonical row enriched with every derived metric; the unit of upsert.
///
/// Recomputed fresh on every ingestion run and written whole, never merged
/// field-by-field against previously stored state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    pub date: NaiveDate,
    pub country_id: String,

    // Inputs carried through from the canonical row
    pub spend: BTreeMap<String, f64>,
    pub settlement_revenue_local: f64,
    pub settlement_revenue_settled: f64,
    pub own_revenue_local: f64,
    pub own_revenue_settled: f64,
    pub first_deposit_count: u32,
    pub first_deposit_sum_local: f64,
    pub other_costs: BTreeMap<String, f64>,

    // Derived metrics, in derivation order
    pub total_spend: f64,
    pub agency_fee: f64,
    pub exchange_rate_settlement: f64,
    pub commission_settlement: f64,
    pub exchange_rate_own: f64,
    pub total_revenue_settled: f64,
    pub first_deposit_sum_settled: f64,
    pub repeat_deposit_sum_local: f64,
    pub repeat_deposit_sum_settled: f64,
    pub handler_repeat_deposit_pay: f64,
    pub handler_first_deposit_pay: f64,
    pub buyer_pay: f64,
    pub fixed_role_pay: f64,
    pub total_payroll: f64,
    pub total_expenses: f64,
    pub expenses_excluding_spend: f64,
    pub net_profit: f64,
    pub roi: f64,
}

impl DerivedRecord {
    /// Record carrying the row's inputs with all derived metrics zeroed
    pub fn from_canonical(row: &CanonicalRow, country_id: impl Into<String>) -> Self {
        Self {
            date: row.date,
            country_id: country_id.into(),
            spend: row.spend.clone(),
            settlement_revenue_local: row.settlement_revenue_local,
            settlement_revenue_settled: row.settlement_revenue_settled,
            own_revenue_local: row.own_revenue_local,
            own_revenue_settled: row.own_revenue_settled,
            first_deposit_count: row.first_deposit_count,
            first_deposit_sum_local: row.first_deposit_sum_local,
            other_costs: row.other_costs.clone(),
            total_spend: 0.0,
            agency_fee: 0.0,
            exchange_rate_settlement: 0.0,
            commission_settlement: 0.0,
            exchange_rate_own: 0.0,
            total_revenue_settled: 0.0,
            first_deposit_sum_settled: 0.0,
            repeat_deposit_sum_local: 0.0,
            repeat_deposit_sum_settled: 0.0,
            handler_repeat_deposit_pay: 0.0,
            handler_first_deposit_pay: 0.0,
            buyer_pay: 0.0,
            fixed_role_pay: 0.0,
            total_payroll: 0.0,
            total_expenses: 0.0,
            expenses_excluding_spend: 0.0,
            net_profit: 0.0,
            roi: 0.0,
        }
    }

    /// Read one derived metric by identifier
    pub fn field(&self, field: DerivedField) -> f64 {
        match field {
            DerivedField::TotalSpend => self.total_spend,
            DerivedField::AgencyFee => self.agency_fee,
            DerivedField::ExchangeRateSettlement => self.exchange_rate_settlement,
            DerivedField::CommissionSettlement => self.commission_settlement,
            DerivedField::ExchangeRateOwn => self.exchange_rate_own,
            DerivedField::TotalRevenueSettled => self.total_revenue_settled,
            DerivedField::FirstDepositSumSettled => self.first_deposit_sum_settled,
            DerivedField::RepeatDepositSumLocal => self.repeat_deposit_sum_local,
            DerivedField::RepeatDepositSumSettled => self.repeat_deposit_sum_settled,
            DerivedField::HandlerRepeatDepositPay => self.handler_repeat_deposit_pay,
            DerivedField::HandlerFirstDepositPay => self.handler_first_deposit_pay,
            DerivedField::BuyerPay => self.buyer_pay,
            DerivedField::FixedRolePay => self.fixed_role_pay,
            DerivedField::TotalPayroll => self.total_payroll,
            DerivedField::TotalExpenses => self.total_expenses,
            DerivedField::ExpensesExcludingSpend => self.expenses_excluding_spend,
            DerivedField::NetProfit => self.net_profit,
            DerivedField::Roi => self.roi,
        }
    }

    /// Write one derived metric by identifier
    pub fn set_field(&mut self, field: DerivedField, value: f64) {
        match field {
            DerivedField::TotalSpend => self.total_spend = value,
            DerivedField::AgencyFee => self.agency_fee = value,
            DerivedField::ExchangeRateSettlement => self.exchange_rate_settlement = value,
            DerivedField::CommissionSettlement => self.commission_settlement = value,
            DerivedField::ExchangeRateOwn => self.exchange_rate_own = value,
            DerivedField::TotalRevenueSettled => self.total_revenue_settled = value,
            DerivedField::FirstDepositSumSettled => self.first_deposit_sum_settled = value,
            DerivedField::RepeatDepositSumLocal => self.repeat_deposit_sum_local = value,
            DerivedField::RepeatDepositSumSettled => self.repeat_deposit_sum_settled = value,
            DerivedField::HandlerRepeatDepositPay => self.handler_repeat_deposit_pay = value,
            DerivedField::HandlerFirstDepositPay => self.handler_first_deposit_pay = value,
            DerivedField::BuyerPay => self.buyer_pay = value,
            DerivedField::FixedRolePay => self.fixed_role_pay = value,
            DerivedField::TotalPayroll => self.total_payroll = value,
            DerivedField::TotalExpenses => self.total_expenses = value,
            DerivedField::ExpensesExcludingSpend => self.expenses_excluding_spend = value,
            DerivedField::NetProfit => self.net_profit = value,
            DerivedField::Roi => self.roi = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_empty_row_detection() {
        let mut row = CanonicalRow::empty(day());
        assert!(row.is_empty());

        row.spend.insert("facebook".to_string(), 0.0);
        assert!(row.is_empty());

        row.own_revenue_local = 120.0;
        assert!(!row.is_empty());
    }

    #[test]
    fn test_precomputed_values_count_as_activity() {
        let mut row = CanonicalRow::empty(day());
        row.precomputed.insert(DerivedField::NetProfit, 42.0);
        assert!(!row.is_empty());
    }

    #[test]
    fn test_field_roundtrip_for_all_metrics() {
        let row = CanonicalRow::empty(day());
        let mut record = DerivedRecord::from_canonical(&row, "PE");

        for (i, field) in DerivedField::ALL.iter().enumerate() {
            record.set_field(*field, i as f64 + 0.5);
        }
        for (i, field) in DerivedField::ALL.iter().enumerate() {
            assert_eq!(record.field(*field), i as f64 + 0.5);
        }
    }

    #[test]
    fn test_from_canonical_carries_inputs() {
        let mut row = CanonicalRow::empty(day());
        row.spend.insert("google".to_string(), 250.0);
        row.own_revenue_settled = 90.0;
        row.first_deposit_count = 7;

        let record = DerivedRecord::from_canonical(&row, "IN");
        assert_eq!(record.country_id, "IN");
        assert_eq!(record.spend.get("google"), Some(&250.0));
        assert_eq!(record.own_revenue_settled, 90.0);
        assert_eq!(record.first_deposit_count, 7);
        assert_eq!(record.net_profit, 0.0);
    }
}
