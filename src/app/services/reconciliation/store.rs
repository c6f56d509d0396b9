//! Storage collaborator interface
//!
//! Long-term persistence is owned by an external collaborator; the engine
//! only needs an upsert keyed uniquely by (date, country). The in-memory
//! implementation backs tests and the CLI adapter.

use crate::app::models::DerivedRecord;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Storage keyed uniquely on (date, countryId).
///
/// An upsert fully replaces any record already stored under its key, so
/// re-running an ingestion with identical inputs leaves identical state.
pub trait MetricsStore: Send + Sync {
    fn find_by_date_and_country(
        &self,
        date: NaiveDate,
        country_id: &str,
    ) -> Result<Option<DerivedRecord>>;

    fn upsert(&self, record: &DerivedRecord) -> Result<()>;
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<(NaiveDate, String), DerivedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all records ordered by (date, country)
    pub fn records(&self) -> Vec<DerivedRecord> {
        self.records
            .lock()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl MetricsStore for MemoryStore {
    fn find_by_date_and_country(
        &self,
        date: NaiveDate,
        country_id: &str,
    ) -> Result<Option<DerivedRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| Error::storage("memory store lock poisoned"))?;
        Ok(records.get(&(date, country_id.to_string())).cloned())
    }

    fn upsert(&self, record: &DerivedRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| Error::storage("memory store lock poisoned"))?;
        records.insert(
            (record.date, record.country_id.clone()),
            record.clone(),
        );
        Ok(())
    }
}
