//! Metric derivation engine
//!
//! Derives every financial metric of a record from one canonical row and the
//! rate configuration. The computation is a fixed dependency cascade: later
//! fields consume earlier ones, all rates come from configuration, and there
//! is no I/O, no hidden state, and no clock beyond the row's own date.
//!
//! Numeric edge cases never raise: every division guards its denominator and
//! substitutes zero, the documented sentinel for "rate unknown". Negative
//! derived values (inconsistent source figures) are kept as-is for upstream
//! reporting to surface.

pub mod payroll;

#[cfg(test)]
pub mod tests;

use crate::app::models::{CanonicalRow, DerivedRecord, SheetContext};
use crate::config::RatesConfig;

/// Derives the full metric set for canonical rows under one rate configuration
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    rates: RatesConfig,
}

impl MetricsEngine {
    pub fn new(rates: RatesConfig) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RatesConfig {
        &self.rates
    }

    /// Compute the derived record for one row. Deterministic and
    /// side-effect-free: identical inputs produce an identical record.
    pub fn derive(&self, row: &CanonicalRow, ctx: &SheetContext) -> DerivedRecord {
        let mut record = DerivedRecord::from_canonical(row, &ctx.country_id);

        record.total_spend = row.total_spend();
        record.agency_fee = row
            .spend
            .iter()
            .map(|(channel, amount)| amount * self.rates.channel_rate(channel))
            .sum();

        record.exchange_rate_settlement = ratio(
            row.settlement_revenue_local,
            row.settlement_revenue_settled,
        );
        record.commission_settlement =
            row.settlement_revenue_settled * self.rates.settlement_commission_rate;

        record.exchange_rate_own = if row.own_revenue_settled > 0.0 {
            row.own_revenue_local / row.own_revenue_settled
        } else {
            ctx.exchange_rate_override.unwrap_or(0.0)
        };

        record.total_revenue_settled = row.settlement_revenue_settled + row.own_revenue_settled;
        record.first_deposit_sum_settled =
            to_settled(row.first_deposit_sum_local, record.exchange_rate_own);

        // May go negative when source figures disagree; kept as-is so the
        // inconsistency stays visible downstream
        record.repeat_deposit_sum_local = row.own_revenue_local - row.first_deposit_sum_local;
        record.repeat_deposit_sum_settled =
            to_settled(record.repeat_deposit_sum_local, record.exchange_rate_own);

        let payroll_config = &self.rates.payroll;
        record.handler_repeat_deposit_pay =
            payroll::handler_repeat_deposit_pay(payroll_config, record.repeat_deposit_sum_settled);
        record.handler_first_deposit_pay =
            payroll::handler_first_deposit_pay(payroll_config, row.first_deposit_count);
        record.buyer_pay = record.total_spend * payroll_config.buyer_rate;
        record.fixed_role_pay = payroll_config.fixed_role_total();
        record.total_payroll = record.handler_repeat_deposit_pay
            + record.handler_first_deposit_pay
            + record.buyer_pay
            + record.fixed_role_pay;

        let other_costs = row.other_costs_total();
        record.total_expenses = record.commission_settlement
            + record.total_spend
            + record.agency_fee
            + record.total_payroll
            + other_costs;
        record.expenses_excluding_spend = record.total_expenses - record.total_spend;

        // Profit counts directly received revenue only; the settlement
        // channel is accounted through its commission, not the numerator
        record.net_profit = row.own_revenue_settled
            - record.commission_settlement
            - record.agency_fee
            - record.total_spend
            - record.total_payroll
            - other_costs;

        record.roi = if record.total_expenses > 0.0 {
            (record.total_revenue_settled - record.total_expenses) / record.total_expenses
        } else {
            0.0
        };

        record
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn to_settled(local_amount: f64, exchange_rate: f64) -> f64 {
    if exchange_rate > 0.0 {
        local_amount / exchange_rate
    } else {
        0.0
    }
}
