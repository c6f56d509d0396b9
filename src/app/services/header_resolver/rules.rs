//! Default header resolution rules
//!
//! The rule list is ordered: the first matching rule wins, so narrower and
//! negated label families (pre-computed fees, repeat-deposit variants) sit
//! above the broader families whose substrings they share.

use super::HeaderRule;
use crate::app::models::{DerivedField, FieldId};
use crate::config::ChannelConfig;

fn owned(groups: &[&[&str]]) -> Vec<Vec<String>> {
    groups
        .iter()
        .map(|group| group.iter().map(|s| s.to_string()).collect())
        .collect()
}

fn owned_flat(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Build the default ordered rule list. Channel spend aliases come from the
/// rate configuration; everything else is the built-in label vocabulary.
pub fn default_rules(channels: &[ChannelConfig]) -> Vec<HeaderRule> {
    let mut rules = Vec::new();

    // Row date
    rules.push(HeaderRule::new(
        FieldId::Date,
        owned(&[&["дата", "date"]]),
        vec![],
    ));

    // Pre-computed metrics the source may carry. These must come before the
    // raw-value families because their labels embed the same substrings
    // ("Комиссия ФБ" must never read as facebook spend).
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::Roi),
        owned(&[&["roi", "рои"]]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::NetProfit),
        owned(&[&["профит", "profit", "прибыл"]]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::CommissionSettlement),
        owned(&[&["комис"], &["p2p", "п2п"]]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::AgencyFee),
        owned(&[&["комис"], &["агент", "agency"]]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::TotalPayroll),
        owned(&[&["зарплат", "payroll", "фот", "зп"]]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::TotalSpend),
        owned(&[&["спенд", "spend"], &["общ", "итог", "total"]]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::ExchangeRateSettlement),
        owned(&[&["курс", "rate"], &["p2p", "п2п"]]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::ExchangeRateOwn),
        owned(&[&["курс", "rate"]]),
        owned_flat(&["p2p", "п2п"]),
    ));

    // Per-channel spend, aliases from configuration
    for channel in channels {
        let aliases: Vec<String> = channel
            .aliases
            .iter()
            .map(|alias| alias.to_lowercase())
            .collect();
        rules.push(HeaderRule::new(
            FieldId::Spend(channel.name.clone()),
            vec![aliases],
            owned_flat(&["комис"]),
        ));
    }

    // Repeat-deposit sums. "неФД" is the negated first-deposit form and must
    // land here, never in the first-deposit family below.
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::RepeatDepositSumSettled),
        owned(&[
            &["рд", "повтор", "repeat", "нефд", "не фд"],
            &["usdt", "усдт"],
        ]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::Precomputed(DerivedField::RepeatDepositSumLocal),
        owned(&[&["рд", "повтор", "repeat", "нефд", "не фд"]]),
        owned_flat(&["usdt", "усдт", "кол", "count", "шт"]),
    ));

    // First deposits
    rules.push(HeaderRule::new(
        FieldId::FirstDepositCount,
        owned(&[
            &["фд", "fd", "депоз"],
            &["кол", "count", "шт", "qty", "число"],
        ]),
        owned_flat(&["нефд", "не фд", "рд", "повтор", "repeat", "сумм", "sum"]),
    ));
    rules.push(HeaderRule::new(
        FieldId::FirstDepositSumLocal,
        owned(&[&["фд", "fd", "депоз"], &["сумм", "sum"]]),
        owned_flat(&["нефд", "не фд", "рд", "повтор", "repeat", "usdt", "усдт"]),
    ));

    // Settlement-channel revenue; the settled (usdt) form first
    rules.push(HeaderRule::new(
        FieldId::SettlementRevenueSettled,
        owned(&[&["p2p", "п2п"], &["usdt", "усдт"]]),
        vec![],
    ));
    rules.push(HeaderRule::new(
        FieldId::SettlementRevenueLocal,
        owned(&[&["p2p", "п2п"]]),
        owned_flat(&["usdt", "усдт"]),
    ));

    // Directly received revenue
    rules.push(HeaderRule::new(
        FieldId::OwnRevenueSettled,
        owned(&[
            &["приход", "income", "revenue", "выруч"],
            &["usdt", "усдт"],
        ]),
        owned_flat(&["p2p", "п2п"]),
    ));
    rules.push(HeaderRule::new(
        FieldId::OwnRevenueLocal,
        owned(&[&["приход", "income", "revenue", "выруч"]]),
        owned_flat(&["usdt", "усдт", "p2p", "п2п"]),
    ));

    // Named additional expenses
    rules.push(HeaderRule::new(
        FieldId::OtherCost("tracker".to_string()),
        owned(&[&["keitaro", "кейтаро", "трекер", "tracker"]]),
        vec![],
    ));
    // "Общие расходы" is a grand total, not an input; the exclusion keeps it
    // out of the additional-expense field.
    rules.push(HeaderRule::new(
        FieldId::OtherCost("misc".to_string()),
        owned(&[&["расход", "затрат", "expense"]]),
        owned_flat(&["общ", "итог", "total"]),
    ));

    rules
}
