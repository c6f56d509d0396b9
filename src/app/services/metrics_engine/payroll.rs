//! Payroll derivation helpers

use crate::config::PayrollConfig;

/// Handler pay for first deposits: tiered per-deposit rate plus the daily
/// bonus once the count reaches the threshold, scaled by the multiplier.
pub fn handler_first_deposit_pay(config: &PayrollConfig, first_deposit_count: u32) -> f64 {
    let rate = config.tier_rate(first_deposit_count);
    let bonus = if first_deposit_count >= config.bonus_threshold {
        config.bonus_amount
    } else {
        0.0
    };
    (first_deposit_count as f64 * rate + bonus) * config.multiplier
}

/// Handler pay on the settled repeat-deposit sum
pub fn handler_repeat_deposit_pay(config: &PayrollConfig, repeat_deposit_sum_settled: f64) -> f64 {
    repeat_deposit_sum_settled * config.repeat_handler_rate
}
