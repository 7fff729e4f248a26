//! HTTP client for the Saleor GraphQL API, authenticated as the installed app.

mod jwks;
mod products;
mod settings;
mod webhooks;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::AuthData;
use crate::error::SaleorError;
use crate::types::GraphQlResponse;

/// Maximum number of product pages fetched before giving up.
/// Prevents infinite loops on cycling cursors.
pub(super) const MAX_PAGES: usize = 500;

/// Client for one Saleor instance.
///
/// Every request carries the app token as a bearer credential. Non-2xx
/// statuses and GraphQL `errors` are returned as typed [`SaleorError`]s;
/// nothing is retried.
pub struct SaleorClient {
    pub(super) client: Client,
    pub(super) auth: AuthData,
    pub(super) api_url: reqwest::Url,
}

impl SaleorClient {
    /// Creates a client for the instance described by `auth`.
    ///
    /// # Errors
    ///
    /// - [`SaleorError::InvalidApiUrl`] if `auth.saleor_api_url` is not an
    ///   absolute URL.
    /// - [`SaleorError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(auth: AuthData, timeout_secs: u64, user_agent: &str) -> Result<Self, SaleorError> {
        let api_url =
            reqwest::Url::parse(&auth.saleor_api_url).map_err(|e| SaleorError::InvalidApiUrl {
                url: auth.saleor_api_url.clone(),
                reason: e.to_string(),
            })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            auth,
            api_url,
        })
    }

    #[must_use]
    pub fn auth(&self) -> &AuthData {
        &self.auth
    }

    /// Posts one GraphQL operation and returns its `data`.
    ///
    /// # Errors
    ///
    /// - [`SaleorError::UnexpectedStatus`] on any non-2xx status.
    /// - [`SaleorError::GraphQl`] when the response carries `errors` or no
    ///   `data`.
    /// - [`SaleorError::Deserialize`] if the body is not the expected shape.
    /// - [`SaleorError::Http`] on network failure.
    pub(super) async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, SaleorError> {
        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.auth.token)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SaleorError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.api_url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: GraphQlResponse<T> =
            serde_json::from_str(&body).map_err(|e| SaleorError::Deserialize {
                context: format!("{operation} response from {}", self.auth.domain()),
                source: e,
            })?;

        if !parsed.errors.is_empty() {
            return Err(SaleorError::GraphQl {
                operation: operation.to_owned(),
                message: parsed
                    .errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }

        parsed.data.ok_or_else(|| SaleorError::GraphQl {
            operation: operation.to_owned(),
            message: "response contained no data".to_string(),
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
