//! Configuration management and validation.
//!
//! Provides the commission and payroll rate structures that parameterize the
//! metrics engine, with global defaults and per-country partial overrides.
//! Rates are configuration, never business logic baked into the engine.

use crate::constants::{
    DEFAULT_BONUS_AMOUNT, DEFAULT_BONUS_THRESHOLD, DEFAULT_BUYER_RATE, DEFAULT_FACEBOOK_RATE,
    DEFAULT_FIRST_DEPOSIT_TIERS, DEFAULT_GOOGLE_RATE, DEFAULT_PAYROLL_MULTIPLIER,
    DEFAULT_REPEAT_HANDLER_RATE, DEFAULT_SETTLEMENT_COMMISSION_RATE,
    DEFAULT_SUPERVISOR_DAILY_RATE, DEFAULT_TIKTOK_RATE,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One advertising channel: spend column aliases plus its agency commission rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Canonical channel key (e.g. "facebook")
    pub name: String,

    /// Agency commission charged on this channel's spend
    pub commission_rate: f64,

    /// Normalized header substrings that identify this channel's spend column
    pub aliases: Vec<String>,
}

/// First-deposit payroll tier: applies from `min_count` deposits upward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositTier {
    pub min_count: u32,
    pub rate: f64,
}

/// A role paid a fixed amount per day rather than per metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedRole {
    pub name: String,
    pub daily_rate: f64,
}

/// Payroll rate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Buyer pay as a share of total spend
    pub buyer_rate: f64,

    /// Handler pay as a share of the settled repeat-deposit sum
    pub repeat_handler_rate: f64,

    /// Per-deposit handler rates, tiered by first-deposit count.
    /// Must be sorted ascending by `min_count` with the first tier at 0.
    pub tiers: Vec<DepositTier>,

    /// First-deposit count from which the daily bonus applies
    pub bonus_threshold: u32,

    /// Daily bonus amount in settled currency
    pub bonus_amount: f64,

    /// Multiplier applied to the first-deposit handler pay
    pub multiplier: f64,

    /// Roles paid per day regardless of activity
    pub fixed_roles: Vec<FixedRole>,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            buyer_rate: DEFAULT_BUYER_RATE,
            repeat_handler_rate: DEFAULT_REPEAT_HANDLER_RATE,
            tiers: DEFAULT_FIRST_DEPOSIT_TIERS
                .iter()
                .map(|&(min_count, rate)| DepositTier { min_count, rate })
                .collect(),
            bonus_threshold: DEFAULT_BONUS_THRESHOLD,
            bonus_amount: DEFAULT_BONUS_AMOUNT,
            multiplier: DEFAULT_PAYROLL_MULTIPLIER,
            fixed_roles: vec![FixedRole {
                name: "supervisor".to_string(),
                daily_rate: DEFAULT_SUPERVISOR_DAILY_RATE,
            }],
        }
    }
}

impl PayrollConfig {
    /// Per-deposit rate for a given first-deposit count.
    ///
    /// Picks the last tier whose `min_count` does not exceed the count, so a
    /// count sitting exactly on a boundary belongs to the higher tier.
    pub fn tier_rate(&self, first_deposit_count: u32) -> f64 {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.min_count <= first_deposit_count)
            .map(|tier| tier.rate)
            .unwrap_or(0.0)
    }

    /// Total fixed daily pay across configured roles
    pub fn fixed_role_total(&self) -> f64 {
        self.fixed_roles.iter().map(|role| role.daily_rate).sum()
    }
}

/// Complete rate configuration for one country (or the global default)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Advertising channels with spend aliases and agency commission rates
    pub channels: Vec<ChannelConfig>,

    /// Commission retained by the settlement channel
    pub settlement_commission_rate: f64,

    /// Payroll rates
    pub payroll: PayrollConfig,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            channels: vec![
                ChannelConfig {
                    name: "facebook".to_string(),
                    commission_rate: DEFAULT_FACEBOOK_RATE,
                    aliases: vec![
                        "facebook".to_string(),
                        "фейсбук".to_string(),
                        "фб".to_string(),
                        "fb".to_string(),
                    ],
                },
                ChannelConfig {
                    name: "google".to_string(),
                    commission_rate: DEFAULT_GOOGLE_RATE,
                    aliases: vec!["google".to_string(), "гугл".to_string(), "gg".to_string()],
                },
                ChannelConfig {
                    name: "tiktok".to_string(),
                    commission_rate: DEFAULT_TIKTOK_RATE,
                    aliases: vec![
                        "tiktok".to_string(),
                        "тикток".to_string(),
                        "тик ток".to_string(),
                    ],
                },
            ],
            settlement_commission_rate: DEFAULT_SETTLEMENT_COMMISSION_RATE,
            payroll: PayrollConfig::default(),
        }
    }
}

impl RatesConfig {
    /// Agency commission rate for a channel key, 0 when the channel is unknown
    pub fn channel_rate(&self, name: &str) -> f64 {
        self.channels
            .iter()
            .find(|channel| channel.name == name)
            .map(|channel| channel.commission_rate)
            .unwrap_or(0.0)
    }

    /// Replace the settlement commission rate
    pub fn with_settlement_commission_rate(mut self, rate: f64) -> Self {
        self.settlement_commission_rate = rate;
        self
    }

    /// Replace the payroll section
    pub fn with_payroll(mut self, payroll: PayrollConfig) -> Self {
        self.payroll = payroll;
        self
    }

    /// Validate rate ranges and tier ordering
    pub fn validate(&self) -> Result<()> {
        for channel in &self.channels {
            if !(0.0..=1.0).contains(&channel.commission_rate) {
                return Err(Error::configuration(format!(
                    "channel '{}' commission rate {} must be between 0 and 1",
                    channel.name, channel.commission_rate
                )));
            }
            if channel.aliases.is_empty() {
                return Err(Error::configuration(format!(
                    "channel '{}' has no header aliases",
                    channel.name
                )));
            }
        }

        for rate in [
            self.settlement_commission_rate,
            self.payroll.buyer_rate,
            self.payroll.repeat_handler_rate,
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::configuration(format!(
                    "rate {} must be between 0 and 1",
                    rate
                )));
            }
        }

        let tiers = &self.payroll.tiers;
        if tiers.is_empty() || tiers[0].min_count != 0 {
            return Err(Error::configuration(
                "payroll tiers must start at a minimum count of 0",
            ));
        }
        if !tiers.windows(2).all(|pair| pair[0].min_count < pair[1].min_count) {
            return Err(Error::configuration(
                "payroll tiers must be sorted by ascending minimum count",
            ));
        }

        Ok(())
    }
}

/// Partial payroll override for one country; absent fields fall back to the default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollOverride {
    #[serde(default)]
    pub buyer_rate: Option<f64>,
    #[serde(default)]
    pub repeat_handler_rate: Option<f64>,
    #[serde(default)]
    pub tiers: Option<Vec<DepositTier>>,
    #[serde(default)]
    pub bonus_threshold: Option<u32>,
    #[serde(default)]
    pub bonus_amount: Option<f64>,
    #[serde(default)]
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub fixed_roles: Option<Vec<FixedRole>>,
}

/// Partial rate override for one country
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatesOverride {
    /// Channel key to replacement commission rate
    #[serde(default)]
    pub channel_rates: HashMap<String, f64>,

    #[serde(default)]
    pub settlement_commission_rate: Option<f64>,

    #[serde(default)]
    pub payroll: PayrollOverride,
}

impl RatesOverride {
    /// Apply this override on top of a base configuration
    pub fn apply(&self, base: &RatesConfig) -> RatesConfig {
        let mut config = base.clone();

        for channel in &mut config.channels {
            if let Some(rate) = self.channel_rates.get(&channel.name) {
                channel.commission_rate = *rate;
            }
        }

        if let Some(rate) = self.settlement_commission_rate {
            config.settlement_commission_rate = rate;
        }

        let payroll = &mut config.payroll;
        if let Some(rate) = self.payroll.buyer_rate {
            payroll.buyer_rate = rate;
        }
        if let Some(rate) = self.payroll.repeat_handler_rate {
            payroll.repeat_handler_rate = rate;
        }
        if let Some(tiers) = &self.payroll.tiers {
            payroll.tiers = tiers.clone();
        }
        if let Some(threshold) = self.payroll.bonus_threshold {
            payroll.bonus_threshold = threshold;
        }
        if let Some(amount) = self.payroll.bonus_amount {
            payroll.bonus_amount = amount;
        }
        if let Some(multiplier) = self.payroll.multiplier {
            payroll.multiplier = multiplier;
        }
        if let Some(roles) = &self.payroll.fixed_roles {
            payroll.fixed_roles = roles.clone();
        }

        config
    }
}

/// Global default rates plus per-country overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatesBook {
    #[serde(default)]
    pub default: RatesConfig,

    /// Country identifier to partial override
    #[serde(default)]
    pub countries: HashMap<String, RatesOverride>,
}

impl RatesBook {
    /// Effective configuration for a country, falling back to the default
    pub fn for_country(&self, country_id: &str) -> RatesConfig {
        match self.countries.get(country_id) {
            Some(overrides) => overrides.apply(&self.default),
            None => self.default.clone(),
        }
    }

    /// Load a rates book from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read rates file {}", path.display()), e))?;
        let book: RatesBook = serde_json::from_str(&content)?;
        book.default.validate()?;
        for (country, overrides) in &book.countries {
            overrides.apply(&book.default).validate().map_err(|e| {
                Error::configuration(format!("override for country '{}': {}", country, e))
            })?;
        }
        debug!(
            "Loaded rates book with {} country overrides from {}",
            book.countries.len(),
            path.display()
        );
        Ok(book)
    }
}
