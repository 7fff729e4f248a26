//! `import` and `ping` commands.

use algosync_backfill::{Backfill, ImportPhase, SaleorProducts};
use algosync_saleor::SaleorClient;

use crate::context::CliContext;

/// Imports the whole catalog, logging progress after every batch.
///
/// With `dry_run`, fetches the catalog and reports counts and target indices
/// without writing anything.
pub(crate) async fn run_import(
    ctx: &CliContext,
    batch_size: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let settings = ctx.require_settings().await?;
    let batch_size = batch_size.unwrap_or(ctx.config.import_batch_size);
    if batch_size == 0 {
        anyhow::bail!("--batch-size must be at least 1");
    }

    if dry_run {
        return dry_run_summary(
            &ctx.saleor,
            ctx.config.products_page_size,
            settings.index_name_prefix.as_deref(),
            batch_size,
        )
        .await;
    }

    let algolia = ctx.algolia_client(&settings)?;
    let source = SaleorProducts::new(ctx.saleor.clone(), ctx.config.products_page_size);
    let backfill = Backfill::new(source, algolia).with_batch_size(batch_size);

    let done = backfill
        .run(|progress| {
            if progress.phase == ImportPhase::Importing {
                tracing::info!(
                    variants_imported = progress.variants_imported,
                    variants_total = progress.variants_total,
                    percent = progress.percent(),
                    "import progress"
                );
            }
        })
        .await?;

    println!(
        "imported {} products ({} variants)",
        done.products_imported, done.variants_imported
    );
    Ok(())
}

async fn dry_run_summary(
    saleor: &SaleorClient,
    page_size: u32,
    prefix: Option<&str>,
    batch_size: usize,
) -> anyhow::Result<()> {
    let products = saleor.fetch_all_products(page_size).await?;
    let variants: usize = products.iter().map(algosync_core::Product::variant_count).sum();
    let indices = crate::index_names::catalog_index_names(&products, prefix);

    println!(
        "[dry-run] would import {} products ({variants} variants) in {} batches of up to {batch_size}",
        products.len(),
        products.len().div_ceil(batch_size)
    );
    for index in indices {
        println!("[dry-run]   -> {index}");
    }
    Ok(())
}

/// Verifies the stored settings against Algolia.
pub(crate) async fn run_ping(ctx: &CliContext) -> anyhow::Result<()> {
    let settings = ctx.require_settings().await?;
    let indices = ctx.algolia_client(&settings)?.ping().await?;
    println!(
        "Algolia app {} reachable; {} indices",
        settings.app_id,
        indices.items.len()
    );
    for index in indices.items {
        println!("  {} ({} records)", index.name, index.entries);
    }
    Ok(())
}
