//! Saleor app manifest.

use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::events::WebhookEvent;

pub(super) const APP_ID: &str = "saleor.app.algosync";
const APP_NAME: &str = "Search (Algolia)";
const REQUIRED_PERMISSION: &str = "MANAGE_PRODUCTS";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AppManifest {
    id: &'static str,
    name: &'static str,
    version: &'static str,
    about: &'static str,
    permissions: Vec<&'static str>,
    app_url: String,
    webhooks: Vec<WebhookManifest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WebhookManifest {
    name: String,
    async_events: Vec<&'static str>,
    query: String,
    target_url: String,
    /// Webhooks start off and are switched on once Algolia settings pass a
    /// ping.
    is_active: bool,
}

pub(super) async fn get_manifest(State(state): State<AppState>) -> Json<AppManifest> {
    Json(build_manifest(&state.config.public_url))
}

fn build_manifest(public_url: &str) -> AppManifest {
    let base = public_url.trim_end_matches('/');
    AppManifest {
        id: APP_ID,
        name: APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
        about: "Keeps Algolia search indices in sync with the Saleor catalog.",
        permissions: vec![REQUIRED_PERMISSION],
        app_url: base.to_owned(),
        webhooks: WebhookEvent::ALL
            .into_iter()
            .map(|event| WebhookManifest {
                name: format!("{} webhook", event.subscription_type()),
                async_events: vec![event.as_str()],
                query: event.subscription_query(),
                target_url: format!("{base}/api/webhooks/saleor/{}", event.path_segment()),
                is_active: false,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::test_support::{json_body, test_app, TestServers};

    #[test]
    fn manifest_declares_every_event_inactive() {
        let manifest = build_manifest("https://search.example.com/");
        assert_eq!(manifest.webhooks.len(), 8);
        assert!(manifest.webhooks.iter().all(|w| !w.is_active));
        assert_eq!(
            manifest.webhooks[6].target_url,
            "https://search.example.com/api/webhooks/saleor/product_variant_out_of_stock"
        );
        assert_eq!(manifest.webhooks[6].async_events, ["PRODUCT_VARIANT_OUT_OF_STOCK"]);
    }

    #[tokio::test]
    async fn manifest_route_is_public() {
        let servers = TestServers::start().await;

        let response = test_app(&servers, Some("secret-key"))
            .oneshot(
                Request::builder()
                    .uri("/api/manifest")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["id"], APP_ID);
        assert_eq!(json["permissions"][0], "MANAGE_PRODUCTS");
        assert_eq!(json["appUrl"], "https://search.example.com");
        assert_eq!(json["webhooks"][0]["isActive"], false);
        assert_eq!(json["webhooks"][0]["asyncEvents"][0], "PRODUCT_CREATED");
    }
}
