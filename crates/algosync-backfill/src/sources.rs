//! Seams between the orchestrator and the outside world.

use std::future::Future;
use std::sync::Arc;

use algosync_algolia::{AlgoliaClient, AlgoliaError};
use algosync_core::Product;
use algosync_saleor::{SaleorClient, SaleorError};

/// Where the catalog comes from.
pub trait ProductSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns every product, fully paginated.
    fn fetch_all_products(&self) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;
}

/// Where batches of products are written.
pub trait BatchIndexer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Writes the documents for every variant of `products`. Resolves only
    /// once the write is complete.
    fn index_batch(&self, products: &[Product]) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// The Saleor product query at a fixed page size.
#[derive(Clone)]
pub struct SaleorProducts {
    client: Arc<SaleorClient>,
    page_size: u32,
}

impl SaleorProducts {
    #[must_use]
    pub fn new(client: Arc<SaleorClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

impl ProductSource for SaleorProducts {
    type Error = SaleorError;

    async fn fetch_all_products(&self) -> Result<Vec<Product>, SaleorError> {
        self.client.fetch_all_products(self.page_size).await
    }
}

impl BatchIndexer for AlgoliaClient {
    type Error = AlgoliaError;

    async fn index_batch(&self, products: &[Product]) -> Result<(), AlgoliaError> {
        self.update_batch_products(products).await
    }
}
