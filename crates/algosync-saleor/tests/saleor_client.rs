//! Integration tests for `SaleorClient` against a wiremock GraphQL endpoint.
//!
//! Every operation is a POST to the same URL, so mocks are told apart by a
//! substring of the operation name in the request body.

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use algosync_core::AlgoliaSettings;
use algosync_saleor::{AuthData, SaleorClient, SaleorError};

fn test_client(server: &MockServer) -> SaleorClient {
    let auth = AuthData {
        saleor_api_url: format!("{}/graphql/", server.uri()),
        token: "app-token".to_string(),
        app_id: "QXBwOjE=".to_string(),
    };
    SaleorClient::new(auth, 5, "algosync-test/0.1").expect("failed to build test SaleorClient")
}

fn product_node(id: &str) -> serde_json::Value {
    json!({
        "node": {
            "id": id,
            "name": format!("Product {id}"),
            "slug": id,
            "description": null,
            "attributes": [],
            "metadata": [],
            "variants": [{ "id": format!("{id}-v1"), "name": "Default" }]
        }
    })
}

fn products_page(ids: &[&str], end_cursor: Option<&str>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {
            "products": {
                "pageInfo": { "hasNextPage": end_cursor.is_some(), "endCursor": end_cursor },
                "edges": ids.iter().map(|id| product_node(id)).collect::<Vec<_>>()
            }
        }
    }))
}

fn own_app(metadata: serde_json::Value, webhooks: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {
            "app": { "id": "QXBwOjE=", "privateMetadata": metadata, "webhooks": webhooks }
        }
    }))
}

fn webhook_update_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": { "webhookUpdate": { "errors": [] } }
    }))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_products_follows_cursors_until_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(header("authorization", "Bearer app-token"))
        .and(body_partial_json(json!({ "variables": { "first": 2, "after": null } })))
        .respond_with(products_page(&["p1", "p2"], Some("c1")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql/"))
        .and(body_partial_json(json!({ "variables": { "first": 2, "after": "c1" } })))
        .respond_with(products_page(&["p3"], None))
        .expect(1)
        .mount(&server)
        .await;

    let products = test_client(&server)
        .fetch_all_products(2)
        .await
        .expect("fetch should succeed");

    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p2", "p3"]);
    assert_eq!(products[2].variant_count(), 1);
}

#[tokio::test]
async fn fetch_all_products_surfaces_graphql_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("FetchProducts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "You need one of the following permissions: MANAGE_PRODUCTS" }]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_all_products(100)
        .await
        .expect_err("should fail");
    match err {
        SaleorError::GraphQl { operation, message } => {
            assert_eq!(operation, "FetchProducts");
            assert!(message.contains("MANAGE_PRODUCTS"));
        }
        other => panic!("expected GraphQl error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_all_products(100)
        .await
        .expect_err("should fail");
    assert!(
        matches!(err, SaleorError::UnexpectedStatus { status: 502, .. }),
        "expected UnexpectedStatus(502), got {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_settings_reads_private_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query OwnApp"))
        .respond_with(own_app(
            json!([
                { "key": "appId", "value": "APP" },
                { "key": "secretKey", "value": "secret" },
                { "key": "indexNamePrefix", "value": "shop" }
            ]),
            json!([]),
        ))
        .mount(&server)
        .await;

    let settings = test_client(&server)
        .fetch_settings()
        .await
        .expect("fetch should succeed")
        .expect("settings should be present");
    assert_eq!(settings.app_id, "APP");
    assert_eq!(settings.index_name_prefix.as_deref(), Some("shop"));
}

#[tokio::test]
async fn fetch_settings_returns_none_when_unconfigured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query OwnApp"))
        .respond_with(own_app(json!([]), json!([])))
        .mount(&server)
        .await;

    let settings = test_client(&server)
        .fetch_settings()
        .await
        .expect("fetch should succeed");
    assert!(settings.is_none());
}

#[tokio::test]
async fn save_settings_writes_three_keys_on_own_app() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("updatePrivateMetadata"))
        .and(body_partial_json(json!({
            "variables": {
                "id": "QXBwOjE=",
                "input": [
                    { "key": "appId", "value": "APP" },
                    { "key": "secretKey", "value": "secret" },
                    { "key": "indexNamePrefix", "value": "" }
                ]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "updatePrivateMetadata": { "errors": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = AlgoliaSettings {
        app_id: "APP".to_string(),
        secret_key: "secret".to_string(),
        index_name_prefix: None,
    };
    test_client(&server)
        .save_settings(&settings)
        .await
        .expect("save should succeed");
}

#[tokio::test]
async fn save_settings_surfaces_mutation_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("updatePrivateMetadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "updatePrivateMetadata": {
                    "errors": [{ "field": "id", "message": "Couldn't resolve to a node" }]
                }
            }
        })))
        .mount(&server)
        .await;

    let settings = AlgoliaSettings {
        app_id: "APP".to_string(),
        secret_key: "secret".to_string(),
        index_name_prefix: None,
    };
    let err = test_client(&server)
        .save_settings(&settings)
        .await
        .expect_err("should fail");
    match err {
        SaleorError::Mutation { message, .. } => {
            assert_eq!(message, "id: Couldn't resolve to a node");
        }
        other => panic!("expected Mutation error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Webhooks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn disable_own_webhooks_uses_given_ids_without_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query OwnApp"))
        .respond_with(own_app(json!([]), json!([])))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("webhookUpdate"))
        .and(body_partial_json(json!({ "variables": { "id": "V2ViaG9vazox", "isActive": false } })))
        .respond_with(webhook_update_ok())
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .disable_own_webhooks(Some(vec!["V2ViaG9vazox".to_string()]))
        .await
        .expect("disable should succeed");
}

#[tokio::test]
async fn disable_own_webhooks_fetches_ids_when_absent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query OwnApp"))
        .respond_with(own_app(
            json!([]),
            json!([{ "id": "W1", "isActive": true }, { "id": "W2", "isActive": true }]),
        ))
        .expect(1)
        .mount(&server)
        .await;

    for id in ["W1", "W2"] {
        Mock::given(method("POST"))
            .and(body_string_contains("webhookUpdate"))
            .and(body_partial_json(json!({ "variables": { "id": id, "isActive": false } })))
            .respond_with(webhook_update_ok())
            .expect(1)
            .mount(&server)
            .await;
    }

    test_client(&server)
        .disable_own_webhooks(None)
        .await
        .expect("disable should succeed");
}

#[tokio::test]
async fn enable_own_webhooks_activates_every_webhook() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("query OwnApp"))
        .respond_with(own_app(json!([]), json!([{ "id": "W1", "isActive": false }])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("webhookUpdate"))
        .and(body_partial_json(json!({ "variables": { "id": "W1", "isActive": true } })))
        .respond_with(webhook_update_ok())
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .enable_own_webhooks()
        .await
        .expect("enable should succeed");
}

#[tokio::test]
async fn fetch_jwks_reads_well_known_key_set_without_token() {
    let server = MockServer::start().await;
    let key_set: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/jwks.json")).expect("jwks fixture");
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(key_set))
        .expect(1)
        .mount(&server)
        .await;

    let keys = test_client(&server).fetch_jwks().await.expect("jwks");

    assert_eq!(keys.keys.len(), 1);
    assert!(keys.find("algosync-test-key").is_some());
    let requests = server.received_requests().await.expect("recorded requests");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn fetch_jwks_surfaces_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_jwks()
        .await
        .expect_err("404 must fail");

    assert!(matches!(err, SaleorError::UnexpectedStatus { status: 404, .. }));
}
