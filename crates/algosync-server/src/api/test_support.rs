//! Shared fixtures for router tests: a mock Saleor and a mock Algolia.

use std::sync::Arc;

use algosync_core::{AppConfig, Environment};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{crypto, Algorithm, EncodingKey};
use algosync_saleor::{AuthData, SaleorClient};
use axum::body::to_bytes;
use axum::response::Response;
use axum::Router;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{build_app, AppState};
use crate::middleware::AdminKeys;

pub(crate) const SALEOR_API_PATH: &str = "/graphql/";

pub(crate) struct TestServers {
    pub saleor: MockServer,
    pub algolia: MockServer,
}

impl TestServers {
    pub(crate) async fn start() -> Self {
        Self {
            saleor: MockServer::start().await,
            algolia: MockServer::start().await,
        }
    }

    pub(crate) fn saleor_api_url(&self) -> String {
        format!("{}{SALEOR_API_PATH}", self.saleor.uri())
    }

    pub(crate) fn config(&self) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("socket addr"),
            public_url: "https://search.example.com".to_string(),
            log_level: "debug".to_string(),
            saleor_api_url: self.saleor_api_url(),
            saleor_app_token: "app-token".to_string(),
            saleor_app_id: "QXBwOjE=".to_string(),
            request_timeout_secs: 5,
            user_agent: "algosync-test/0.1".to_string(),
            import_batch_size: 100,
            products_page_size: 100,
            algolia_host_override: Some(self.algolia.uri()),
        }
    }

    pub(crate) fn state(&self) -> AppState {
        let config = self.config();
        let saleor = SaleorClient::new(
            AuthData::from_config(&config),
            config.request_timeout_secs,
            &config.user_agent,
        )
        .expect("saleor client");
        AppState::new(Arc::new(config), Arc::new(saleor))
    }
}

/// Router over `state`; `api_key` requires that single admin key.
pub(crate) fn app_with_state(state: AppState, api_key: Option<&str>) -> Router {
    let admin_keys = match api_key {
        Some(key) => AdminKeys::from_keys(key, false).expect("admin keys"),
        None => AdminKeys::from_keys("", true).expect("admin keys"),
    };
    build_app(state, admin_keys)
}

pub(crate) fn test_app(servers: &TestServers, api_key: Option<&str>) -> Router {
    app_with_state(servers.state(), api_key)
}

/// Response to the `OwnApp` query: stored settings when `configured`, plus
/// the given webhook ids.
pub(crate) fn own_app_response(configured: bool, webhook_ids: &[&str]) -> ResponseTemplate {
    let metadata = if configured {
        json!([
            { "key": "appId", "value": "TESTAPP" },
            { "key": "secretKey", "value": "algolia-secret" },
            { "key": "indexNamePrefix", "value": "" }
        ])
    } else {
        json!([])
    };
    let webhooks: Vec<_> = webhook_ids
        .iter()
        .map(|id| json!({ "id": id, "isActive": true }))
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {
            "app": { "id": "QXBwOjE=", "privateMetadata": metadata, "webhooks": webhooks }
        }
    }))
}

pub(crate) fn webhook_update_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": { "webhookUpdate": { "errors": [] } }
    }))
}

pub(crate) fn algolia_batch_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "taskID": 1, "objectIDs": [] }))
}

pub(crate) async fn json_body(response: Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

const SIGNING_KEY: &[u8] = include_bytes!("../../tests/fixtures/webhook_signing_key.pem");
const KEY_SET: &str = include_str!("../../tests/fixtures/jwks.json");
pub(crate) const SIGNING_KID: &str = "algosync-test-key";

pub(crate) fn key_set() -> algosync_saleor::JwkSet {
    serde_json::from_str(KEY_SET).expect("jwks fixture")
}

/// Serves the fixture key set at the mock Saleor's JWKS endpoint, expecting
/// `times` fetches.
pub(crate) async fn mount_jwks(servers: &TestServers, times: u64) {
    let keys: serde_json::Value = serde_json::from_str(KEY_SET).expect("jwks fixture");
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(keys))
        .expect(times)
        .mount(&servers.saleor)
        .await;
}

/// Detached JWS over `body` in the shape Saleor sends: RS256, unencoded
/// payload, signed with the fixture key under `kid`.
pub(crate) fn sign_with_kid(body: &[u8], kid: &str) -> String {
    let header = json!({ "alg": "RS256", "kid": kid, "b64": false, "crit": ["b64"] });
    let protected = URL_SAFE_NO_PAD.encode(header.to_string());
    let mut message = format!("{protected}.").into_bytes();
    message.extend_from_slice(body);
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY).expect("pem fixture");
    let signature = crypto::sign(&message, &key, Algorithm::RS256).expect("sign");
    format!("{protected}..{signature}")
}

pub(crate) fn sign(body: &[u8]) -> String {
    sign_with_kid(body, SIGNING_KID)
}
