//! HTTP client for the Algolia REST API.
//!
//! Translates catalog operations into batch writes against the per-channel
//! indices. Every call is attempted exactly once; failures are returned to the
//! caller, which decides whether and how to recover.

use std::collections::BTreeMap;
use std::time::Duration;

use algosync_core::{AlgoliaSettings, AppConfig, Product, ProductVariantPayload, SearchDocument};
use futures::future::try_join_all;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;

use crate::error::AlgoliaError;
use crate::grouping::{
    group_object_ids_by_index_name, group_products_by_index_name, group_variant_by_index_name,
};
use crate::types::{BatchAction, BatchOperation, BatchRequest, BatchResponse, ListIndicesResponse};

/// Characters escaped when an index name is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Client for one Algolia application.
///
/// Use [`AlgoliaClient::new`] for production or [`AlgoliaClient::with_host`]
/// to point at a proxy or a mock server in tests.
pub struct AlgoliaClient {
    client: Client,
    base_url: String,
    index_name_prefix: Option<String>,
}

impl AlgoliaClient {
    /// Creates a client for the application in `settings`, talking to
    /// `https://{appId}.algolia.net`.
    ///
    /// # Errors
    ///
    /// Returns [`AlgoliaError::InvalidCredentials`] if the app id or key are
    /// not valid header values, or [`AlgoliaError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(settings: &AlgoliaSettings, timeout_secs: u64) -> Result<Self, AlgoliaError> {
        let host = format!("https://{}.algolia.net", settings.app_id.to_lowercase());
        Self::with_host(settings, timeout_secs, &host)
    }

    /// Creates a client with a custom host (for wiremock or an egress proxy).
    ///
    /// # Errors
    ///
    /// Same as [`AlgoliaClient::new`].
    pub fn with_host(
        settings: &AlgoliaSettings,
        timeout_secs: u64,
        host: &str,
    ) -> Result<Self, AlgoliaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-algolia-application-id",
            HeaderValue::from_str(&settings.app_id)
                .map_err(|_| AlgoliaError::InvalidCredentials("app id".to_string()))?,
        );
        let mut api_key = HeaderValue::from_str(&settings.secret_key)
            .map_err(|_| AlgoliaError::InvalidCredentials("API key".to_string()))?;
        api_key.set_sensitive(true);
        headers.insert("x-algolia-api-key", api_key);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("algosync/0.1 (search-sync)")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: host.trim_end_matches('/').to_owned(),
            index_name_prefix: settings.index_name_prefix.clone(),
        })
    }

    /// Creates a client using the timeout and optional host override from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Same as [`AlgoliaClient::new`].
    pub fn from_app_config(
        settings: &AlgoliaSettings,
        config: &AppConfig,
    ) -> Result<Self, AlgoliaError> {
        match &config.algolia_host_override {
            Some(host) => Self::with_host(settings, config.request_timeout_secs, host),
            None => Self::new(settings, config.request_timeout_secs),
        }
    }

    /// Checks that the credentials are accepted by listing the application's
    /// indices.
    ///
    /// # Errors
    ///
    /// - [`AlgoliaError::Api`] when Algolia rejects the credentials (403) or
    ///   returns any other non-2xx status.
    /// - [`AlgoliaError::Http`] on network failure.
    /// - [`AlgoliaError::Deserialize`] if the response is not the expected shape.
    pub async fn ping(&self) -> Result<ListIndicesResponse, AlgoliaError> {
        let url = format!("{}/1/indexes", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::parse_response(response, "listIndices").await
    }

    /// Upserts the variant's document into the index of every channel it is
    /// listed in.
    ///
    /// # Errors
    ///
    /// Propagates the first failing batch call; see [`AlgoliaClient::ping`].
    pub async fn update_product_variant(
        &self,
        payload: &ProductVariantPayload,
    ) -> Result<(), AlgoliaError> {
        let grouped = group_variant_by_index_name(
            &payload.product,
            &payload.variant,
            self.index_name_prefix.as_deref(),
        );
        self.save_grouped(grouped).await
    }

    /// Upserts documents for every variant of `product`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing batch call.
    pub async fn update_product(&self, product: &Product) -> Result<(), AlgoliaError> {
        self.update_batch_products(std::slice::from_ref(product))
            .await
    }

    /// Upserts documents for every variant of every product, with one batch
    /// call per affected index.
    ///
    /// # Errors
    ///
    /// Propagates the first failing batch call.
    pub async fn update_batch_products(&self, products: &[Product]) -> Result<(), AlgoliaError> {
        let grouped = group_products_by_index_name(products, self.index_name_prefix.as_deref());
        self.save_grouped(grouped).await
    }

    /// Removes the variant's document from every channel index it was listed
    /// in.
    ///
    /// # Errors
    ///
    /// Propagates the first failing batch call.
    pub async fn delete_product_variant(
        &self,
        payload: &ProductVariantPayload,
    ) -> Result<(), AlgoliaError> {
        let grouped = group_object_ids_by_index_name(
            &payload.product,
            &payload.variant,
            self.index_name_prefix.as_deref(),
        );
        self.delete_grouped(grouped).await
    }

    /// Removes the documents of every variant of `product`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing batch call.
    pub async fn delete_product(&self, product: &Product) -> Result<(), AlgoliaError> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for variant in product.variants() {
            let ids =
                group_object_ids_by_index_name(product, variant, self.index_name_prefix.as_deref());
            for (index_name, object_ids) in ids {
                grouped.entry(index_name).or_default().extend(object_ids);
            }
        }
        self.delete_grouped(grouped).await
    }

    async fn save_grouped(
        &self,
        grouped: BTreeMap<String, Vec<SearchDocument>>,
    ) -> Result<(), AlgoliaError> {
        let calls = grouped.into_iter().map(|(index_name, documents)| async move {
            let requests = documents
                .into_iter()
                .map(|document| {
                    serde_json::to_value(document)
                        .map(|body| BatchOperation {
                            action: BatchAction::PartialUpdateObject,
                            body,
                        })
                        .map_err(|e| AlgoliaError::Deserialize {
                            context: format!("document for index {index_name}"),
                            source: e,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            self.send_batch(&index_name, requests).await
        });

        try_join_all(calls).await?;
        Ok(())
    }

    async fn delete_grouped(
        &self,
        grouped: BTreeMap<String, Vec<String>>,
    ) -> Result<(), AlgoliaError> {
        let calls = grouped.into_iter().map(|(index_name, object_ids)| async move {
            let requests = object_ids
                .into_iter()
                .map(|id| BatchOperation {
                    action: BatchAction::DeleteObject,
                    body: serde_json::json!({ "objectID": id }),
                })
                .collect();
            self.send_batch(&index_name, requests).await
        });

        try_join_all(calls).await?;
        Ok(())
    }

    async fn send_batch(
        &self,
        index_name: &str,
        requests: Vec<BatchOperation>,
    ) -> Result<BatchResponse, AlgoliaError> {
        let operation_count = requests.len();
        let url = self.batch_url(index_name);
        let response = self
            .client
            .post(&url)
            .json(&BatchRequest { requests })
            .send()
            .await?;

        let parsed: BatchResponse =
            Self::parse_response(response, &format!("batch({index_name})")).await?;

        tracing::debug!(
            index = index_name,
            operations = operation_count,
            task_id = parsed.task_id,
            "Algolia batch accepted"
        );

        Ok(parsed)
    }

    fn batch_url(&self, index_name: &str) -> String {
        format!(
            "{}/1/indexes/{}/batch",
            self.base_url,
            utf8_percent_encode(index_name, PATH_SEGMENT)
        )
    }

    /// Maps a non-2xx status to [`AlgoliaError::Api`], otherwise parses the
    /// JSON body as `T`.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T, AlgoliaError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<crate::types::ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            return Err(AlgoliaError::Api {
                status: status.as_u16(),
                operation: operation.to_owned(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| AlgoliaError::Deserialize {
            context: operation.to_owned(),
            source: e,
        })
    }
}
