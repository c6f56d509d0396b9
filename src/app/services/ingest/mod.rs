//! Ingestion pipeline orchestration
//!
//! Wires the pipeline together: sheet loading, row normalization, metric
//! derivation, reconciliation, and upsert. One sheet is one batch — its
//! calendar-day dedup set lives and dies with the `ingest_sheet` call, so
//! independent sheets can be processed concurrently without shared state.
//! Files fan out over a bounded `buffer_unordered` stream; everything below
//! the fan-out is synchronous pure computation plus storage calls.

pub mod stats;

#[cfg(test)]
pub mod tests;

use crate::app::models::SheetContext;
use crate::app::services::header_resolver::HeaderResolver;
use crate::app::services::metrics_engine::MetricsEngine;
use crate::app::services::reconciliation::{MetricsStore, ReconciliationService};
use crate::app::services::row_normalizer::{DayDedup, RowNormalizer};
use crate::app::services::sheet_reader::{self, RawSheet};
use crate::config::RatesConfig;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

pub use stats::{IngestStats, RowFailure};

/// The complete ingestion pipeline for one country's rate configuration
pub struct IngestPipeline {
    normalizer: RowNormalizer,
    engine: MetricsEngine,
    reconciliation: ReconciliationService,
}

impl IngestPipeline {
    /// Build a pipeline from a rate configuration and a storage collaborator
    pub fn new(rates: RatesConfig, store: Arc<dyn MetricsStore>) -> Self {
        let resolver = HeaderResolver::from_rates(&rates);
        Self {
            normalizer: RowNormalizer::new(resolver),
            engine: MetricsEngine::new(rates),
            reconciliation: ReconciliationService::new(store),
        }
    }

    /// Ingest one sheet as its own batch: normalize, derive, reconcile,
    /// upsert. A failed upsert is recorded and the batch continues.
    pub fn ingest_sheet(&self, sheet: &RawSheet, ctx: &SheetContext) -> IngestStats {
        let mut dedup = DayDedup::new();
        let outcome = self.normalizer.normalize(sheet, &mut dedup);

        let mut stats = IngestStats::new();
        stats.absorb(&outcome.stats);

        for row in &outcome.rows {
            let derived = self.engine.derive(row, ctx);
            match self.reconciliation.persist(row, derived) {
                Ok(_) => stats.upserted += 1,
                Err(e) => {
                    warn!(
                        "Upsert failed for {} / {}: {}",
                        row.date, ctx.country_id, e
                    );
                    stats.record_failure(row.date, &ctx.country_id, e.to_string());
                }
            }
        }

        info!(
            "Sheet '{}': {} rows seen, {} upserted, {} failed",
            sheet.name,
            stats.rows_seen,
            stats.upserted,
            stats.failed()
        );
        stats
    }

    /// Ingest every sheet of one export file
    pub fn ingest_file(&self, path: &Path, ctx: &SheetContext) -> IngestStats {
        let mut stats = IngestStats::new();
        match sheet_reader::load_file(path) {
            Ok(sheets) => {
                for sheet in &sheets {
                    stats.merge(self.ingest_sheet(sheet, ctx));
                }
                stats.files_processed += 1;
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                stats.record_file_error(format!("{}: {}", path.display(), e));
            }
        }
        stats
    }

    /// Ingest many files concurrently with a bounded fan-out.
    ///
    /// Per-file statistics are merged; merge order does not affect the
    /// stored state because upserts are independent per (date, country).
    pub async fn ingest_files(
        &self,
        paths: Vec<PathBuf>,
        ctx: &SheetContext,
        max_concurrent: usize,
    ) -> IngestStats {
        let results: Vec<IngestStats> = futures::stream::iter(paths.into_iter().map(|path| {
            let ctx = ctx.clone();
            async move { self.ingest_file(&path, &ctx) }
        }))
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

        let mut stats = IngestStats::new();
        for file_stats in results {
            stats.merge(file_stats);
        }
        info!("{}", stats.summary());
        stats
    }

    /// The engine's rate configuration
    pub fn rates(&self) -> &RatesConfig {
        self.engine.rates()
    }

    /// The storage collaborator behind this pipeline
    pub fn store(&self) -> &Arc<dyn MetricsStore> {
        self.reconciliation.store()
    }
}
