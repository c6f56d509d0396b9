//! Header resolution for heterogeneous report exports
//!
//! Daily exports arrive with inconsistent column labels across languages and
//! spellings ("Спенд ФБ", "Facebook spend", "FB"). This module analyzes header
//! labels and maps each to a canonical [`FieldId`] through an ordered list of
//! inclusion/exclusion rules; a label matching no rule is decorative and
//! resolves to nothing.
//!
//! Resolution depends only on label content, never on column position, so the
//! same label always resolves identically.

pub mod rules;

#[cfg(test)]
pub mod tests;

use crate::app::models::FieldId;
use crate::config::RatesConfig;

pub use rules::default_rules;

/// One resolution rule over a normalized label.
///
/// A rule matches when every `require` group contributes at least one
/// substring hit and no `forbid` substring appears. Rules carrying the
/// narrower or negated form of a label family must be listed before the
/// broader family, otherwise near-duplicate labels mislabel.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    pub field: FieldId,
    pub require: Vec<Vec<String>>,
    pub forbid: Vec<String>,
}

impl HeaderRule {
    pub fn new(field: FieldId, require: Vec<Vec<String>>, forbid: Vec<String>) -> Self {
        Self {
            field,
            require,
            forbid,
        }
    }

    /// Test this rule against an already normalized label
    pub fn matches(&self, normalized: &str) -> bool {
        if self.forbid.iter().any(|s| normalized.contains(s.as_str())) {
            return false;
        }
        self.require
            .iter()
            .all(|group| group.iter().any(|s| normalized.contains(s.as_str())))
    }
}

/// Maps raw column labels to canonical field identifiers
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    rules: Vec<HeaderRule>,
}

impl HeaderResolver {
    /// Build a resolver from an explicit ordered rule list
    pub fn new(rules: Vec<HeaderRule>) -> Self {
        Self { rules }
    }

    /// Build a resolver with the default rule set for a rate configuration
    /// (channel spend aliases come from the configured channels)
    pub fn from_rates(rates: &RatesConfig) -> Self {
        Self::new(default_rules(&rates.channels))
    }

    /// Resolve one column label; `None` means the column is ignored
    pub fn resolve(&self, label: &str) -> Option<FieldId> {
        let normalized = normalize_label(label);
        if normalized.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.field.clone())
    }

    /// Resolve a whole header row into a column-index map
    pub fn resolve_headers(&self, headers: &[String]) -> Vec<Option<FieldId>> {
        headers.iter().map(|label| self.resolve(label)).collect()
    }

    /// Number of rules in this resolver
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Normalize a label: trim, lowercase, fold `ё` to `е`, collapse whitespace
pub fn normalize_label(label: &str) -> String {
    let lowered = label.trim().to_lowercase().replace('ё', "е");
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}
