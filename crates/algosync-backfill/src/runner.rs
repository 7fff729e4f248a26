//! The import loop.

use crate::error::BackfillError;
use crate::progress::{ImportPhase, ImportProgress};
use crate::sources::{BatchIndexer, ProductSource};

/// Products per batch call when not configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// One full import: fetch every product, then write them in fixed-size
/// batches. Each batch completes before the next is sent. A failing batch
/// stops the run; rerunning starts over, which is safe because every write is
/// an upsert by object id.
pub struct Backfill<S, I> {
    source: S,
    indexer: I,
    batch_size: usize,
}

impl<S, I> Backfill<S, I>
where
    S: ProductSource + Sync,
    I: BatchIndexer + Sync,
{
    #[must_use]
    pub fn new(source: S, indexer: I) -> Self {
        Self {
            source,
            indexer,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the number of products per batch. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Runs the import, calling `on_progress` on every state change.
    ///
    /// # Errors
    ///
    /// - [`BackfillError::Fetch`] if the catalog cannot be fetched.
    /// - [`BackfillError::Import`] for the first failing batch.
    ///
    /// In both cases `on_progress` has already received a `Failed` snapshot.
    pub async fn run<F>(&self, mut on_progress: F) -> Result<ImportProgress, BackfillError>
    where
        F: FnMut(&ImportProgress) + Send,
    {
        let mut progress = ImportProgress::started();
        on_progress(&progress);

        let products = match self.source.fetch_all_products().await {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(error = %e, "backfill: fetching products failed");
                progress.fail(e.to_string());
                on_progress(&progress);
                return Err(BackfillError::Fetch(Box::new(e)));
            }
        };

        progress.phase = ImportPhase::Importing;
        progress.products_total = products.len();
        progress.variants_total = products.iter().map(algosync_core::Product::variant_count).sum();
        on_progress(&progress);

        let total_batches = products.len().div_ceil(self.batch_size);
        tracing::info!(
            products = progress.products_total,
            variants = progress.variants_total,
            batches = total_batches,
            batch_size = self.batch_size,
            "backfill: importing"
        );

        for (index, batch) in products.chunks(self.batch_size).enumerate() {
            let batch_number = index + 1;
            if let Err(e) = self.indexer.index_batch(batch).await {
                tracing::error!(
                    batch = batch_number,
                    total_batches,
                    error = %e,
                    "backfill: batch failed, stopping"
                );
                progress.fail(e.to_string());
                on_progress(&progress);
                return Err(BackfillError::Import {
                    batch: batch_number,
                    total_batches,
                    source: Box::new(e),
                });
            }

            progress.products_imported += batch.len();
            progress.variants_imported += batch
                .iter()
                .map(algosync_core::Product::variant_count)
                .sum::<usize>();
            tracing::info!(
                batch = batch_number,
                total_batches,
                variants_imported = progress.variants_imported,
                variants_total = progress.variants_total,
                "backfill: batch imported"
            );
            on_progress(&progress);
        }

        progress.finish();
        on_progress(&progress);
        Ok(progress)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
