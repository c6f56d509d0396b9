//! Reconciliation of source-supplied and derived metrics, plus upsert
//!
//! Sheet authors sometimes apply manual end-of-period adjustments the engine
//! cannot reconstruct from raw inputs, so a pre-computed value present in the
//! source wins over the engine's value — but only when non-zero: genuine
//! pre-computed zeros are rare and indistinguishable from an unfilled column.

pub mod store;

#[cfg(test)]
pub mod tests;

use crate::app::models::{CanonicalRow, DerivedRecord};
use crate::Result;
use std::sync::Arc;
use tracing::debug;

pub use store::{MemoryStore, MetricsStore};

/// Apply source precedence: each non-zero pre-computed value replaces the
/// engine's value for that field.
pub fn reconcile(row: &CanonicalRow, mut derived: DerivedRecord) -> DerivedRecord {
    for (field, value) in &row.precomputed {
        if *value != 0.0 {
            debug!(
                "Source value {} overrides derived {} for {:?}",
                value,
                derived.field(*field),
                field
            );
            derived.set_field(*field, *value);
        }
    }
    derived
}

/// Reconciles records and writes them through the storage collaborator
#[derive(Clone)]
pub struct ReconciliationService {
    store: Arc<dyn MetricsStore>,
}

impl ReconciliationService {
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MetricsStore> {
        &self.store
    }

    /// Reconcile one row's record and upsert it under (date, countryId).
    /// Returns the record as stored.
    pub fn persist(&self, row: &CanonicalRow, derived: DerivedRecord) -> Result<DerivedRecord> {
        let record = reconcile(row, derived);
        self.store.upsert(&record)?;
        Ok(record)
    }
}
