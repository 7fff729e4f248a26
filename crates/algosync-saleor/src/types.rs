//! Saleor GraphQL response envelopes.
//!
//! Catalog records themselves live in `algosync_core::catalog`; this module
//! only models the wrappers around them.

use algosync_core::{MetadataItem, Product};
use serde::Deserialize;

/// Standard GraphQL response: `data` plus optional top-level `errors`.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Option<Connection<Product>>,
}

/// `app` query: the app that owns the request token.
#[derive(Debug, Deserialize)]
pub struct OwnAppData {
    pub app: Option<OwnApp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnApp {
    pub id: String,
    #[serde(default)]
    pub private_metadata: Vec<MetadataItem>,
    #[serde(default)]
    pub webhooks: Option<Vec<WebhookNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookNode {
    pub id: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Field-level error reported inside a mutation payload.
#[derive(Debug, Deserialize)]
pub struct MutationError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MutationPayload {
    #[serde(default)]
    pub errors: Vec<MutationError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookUpdateData {
    pub webhook_update: Option<MutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrivateMetadataData {
    pub update_private_metadata: Option<MutationPayload>,
}

impl MutationPayload {
    /// Joins field errors into one message, or `None` when there are none.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| match (&e.field, &e.message) {
                    (Some(field), Some(message)) => format!("{field}: {message}"),
                    (None, Some(message)) => message.clone(),
                    (Some(field), None) => format!("{field}: invalid"),
                    (None, None) => "unknown error".to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
