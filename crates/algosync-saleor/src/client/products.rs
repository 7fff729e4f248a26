//! Paginated product fetch for `SaleorClient`.

use algosync_core::Product;
use serde_json::json;

use crate::error::SaleorError;
use crate::pagination::next_cursor;
use crate::queries::products_document;
use crate::types::{PageInfo, ProductsData};

use super::SaleorClient;
use super::MAX_PAGES;

impl SaleorClient {
    /// Fetches one page of products starting after `after`.
    ///
    /// # Errors
    ///
    /// Propagates [`SaleorClient::execute`] errors; returns
    /// [`SaleorError::GraphQl`] if the `products` connection is null.
    pub async fn fetch_products_page(
        &self,
        first: u32,
        after: Option<&str>,
    ) -> Result<(Vec<Product>, PageInfo), SaleorError> {
        let data: ProductsData = self
            .execute(
                "FetchProducts",
                &products_document(),
                json!({ "first": first, "after": after }),
            )
            .await?;

        let connection = data.products.ok_or_else(|| SaleorError::GraphQl {
            operation: "FetchProducts".to_string(),
            message: "products connection was null".to_string(),
        })?;

        let products = connection.edges.into_iter().map(|e| e.node).collect();
        Ok((products, connection.page_info))
    }

    /// Fetches every product by following cursors until the connection is
    /// exhausted.
    ///
    /// All-or-nothing: a failing page discards what was already fetched.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`]. Returns
    /// [`SaleorError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn fetch_all_products(&self, page_size: u32) -> Result<Vec<Product>, SaleorError> {
        let mut all_products: Vec<Product> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(SaleorError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let (products, page_info) = self
                .fetch_products_page(page_size, cursor.as_deref())
                .await?;

            tracing::debug!(
                page = page_count,
                fetched = products.len(),
                domain = %self.auth.domain(),
                "fetched products page"
            );
            all_products.extend(products);

            cursor = next_cursor(&page_info);
            if cursor.is_none() {
                break;
            }
        }

        Ok(all_products)
    }
}
