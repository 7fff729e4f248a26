//! Saleor webhook receiver.
//!
//! One route serves every subscribed event. The signature middleware has
//! already checked the body against Saleor's signing keys. A request is still
//! rejected before any outbound call unless its `saleor-event` header names
//! the routed event and its `saleor-api-url` header names the configured
//! instance. Each accepted event makes at most one Algolia call sequence; if
//! the stored credentials are unusable or the call fails, the app turns off its
//! own webhooks so Saleor stops delivering events into a broken index, and
//! responds 500.

use algosync_algolia::AlgoliaError;
use algosync_core::{Product, ProductVariantPayload};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::{require_settings, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::events::WebhookEvent;
use crate::middleware::RequestId;

pub(super) const SALEOR_EVENT_HEADER: &str = "saleor-event";
pub(super) const SALEOR_API_URL_HEADER: &str = "saleor-api-url";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload {
    #[serde(default)]
    product: Option<Product>,
    #[serde(default)]
    product_variant: Option<ProductVariantPayload>,
    #[serde(default)]
    recipient: Option<Recipient>,
}

#[derive(Debug, Default, Deserialize)]
struct Recipient {
    #[serde(default)]
    webhooks: Vec<WebhookRef>,
}

#[derive(Debug, Deserialize)]
struct WebhookRef {
    id: String,
}

impl WebhookPayload {
    /// Webhook ids delivered with the event, when Saleor included any.
    fn recipient_webhook_ids(&self) -> Option<Vec<String>> {
        self.recipient
            .as_ref()
            .map(|r| r.webhooks.iter().map(|w| w.id.clone()).collect::<Vec<_>>())
            .filter(|ids| !ids.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub(super) struct WebhookAck {
    event: &'static str,
    /// `false` when the payload carried no entity and nothing was written.
    indexed: bool,
}

pub(super) async fn handle_webhook(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(segment): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<WebhookAck>>, ApiError> {
    let Some(event) = WebhookEvent::parse(&segment) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("unsupported webhook event: {segment}"),
        ));
    };

    verify_headers(&state, &req_id.0, event, &headers)?;

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("invalid webhook payload: {e}"),
        )
    })?;

    tracing::debug!(%event, "webhook received");

    let settings = require_settings(&state, &req_id.0).await.map_err(|e| {
        tracing::debug!(%event, code = %e.error.code, "webhook rejected: settings unavailable");
        ApiError::new(req_id.0.clone(), "bad_request", e.error.message)
    })?;

    let outcome = match state.algolia_client(&settings) {
        Ok(algolia) => apply_event(&algolia, event, &payload).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(indexed) => {
            if !indexed {
                tracing::debug!(%event, "webhook payload carried no entity; nothing to index");
            }
            Ok(Json(ApiResponse {
                data: WebhookAck {
                    event: event.as_str(),
                    indexed,
                },
                meta: ResponseMeta::new(req_id.0),
            }))
        }
        Err(e) => {
            tracing::info!(%event, error = %e, "Algolia operation failed; disabling webhooks");
            if let Err(disable_err) = state
                .saleor
                .disable_own_webhooks(payload.recipient_webhook_ids())
                .await
            {
                tracing::error!(error = %disable_err, "failed to disable webhooks");
            } else {
                tracing::warn!("webhooks disabled after failed Algolia operation");
            }
            Err(ApiError::new(
                req_id.0,
                "internal_error",
                "Operation failed, webhooks are disabled",
            ))
        }
    }
}

fn verify_headers(
    state: &AppState,
    request_id: &str,
    event: WebhookEvent,
    headers: &HeaderMap,
) -> Result<(), ApiError> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    match header(SALEOR_EVENT_HEADER).and_then(WebhookEvent::parse) {
        Some(received) if received == event => {}
        Some(received) => {
            return Err(ApiError::new(
                request_id,
                "bad_request",
                format!("event {received} delivered to the {event} handler"),
            ));
        }
        None => {
            return Err(ApiError::new(
                request_id,
                "bad_request",
                "missing or unknown saleor-event header",
            ));
        }
    }

    let Some(api_url) = header(SALEOR_API_URL_HEADER) else {
        return Err(ApiError::new(
            request_id,
            "bad_request",
            "missing saleor-api-url header",
        ));
    };
    if !state.saleor.auth().matches_api_url(api_url) {
        tracing::warn!(api_url, "webhook from unknown Saleor instance");
        return Err(ApiError::new(
            request_id,
            "unauthorized",
            "webhook from unknown Saleor instance",
        ));
    }

    Ok(())
}

/// Applies `event` to the index. Returns `Ok(false)` when the payload did not
/// carry the entity the event is about.
async fn apply_event(
    algolia: &algosync_algolia::AlgoliaClient,
    event: WebhookEvent,
    payload: &WebhookPayload,
) -> Result<bool, AlgoliaError> {
    if event.is_variant_event() {
        let Some(variant) = &payload.product_variant else {
            return Ok(false);
        };
        if event.is_delete() {
            algolia.delete_product_variant(variant).await?;
        } else {
            algolia.update_product_variant(variant).await?;
        }
    } else {
        let Some(product) = &payload.product else {
            return Ok(false);
        };
        if event.is_delete() {
            algolia.delete_product(product).await?;
        } else {
            algolia.update_product(product).await?;
        }
    }
    Ok(true)
}

#[cfg(test)]
#[path = "webhooks_test.rs"]
mod tests;
