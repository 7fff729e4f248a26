use super::*;

fn auth(url: &str) -> AuthData {
    AuthData {
        saleor_api_url: url.to_string(),
        token: "app-token".to_string(),
        app_id: "QXBwOjE=".to_string(),
    }
}

#[test]
fn new_accepts_absolute_url() {
    let client = SaleorClient::new(auth("https://shop.example.com/graphql/"), 5, "test-agent")
        .expect("client");
    assert_eq!(client.api_url.as_str(), "https://shop.example.com/graphql/");
    assert_eq!(client.auth().app_id, "QXBwOjE=");
}

#[test]
fn new_rejects_relative_url() {
    let result = SaleorClient::new(auth("shop.example.com/graphql/"), 5, "test-agent");
    assert!(
        matches!(result, Err(SaleorError::InvalidApiUrl { .. })),
        "expected InvalidApiUrl"
    );
}

#[test]
fn graphql_response_without_data_parses() {
    let parsed: GraphQlResponse<Value> =
        serde_json::from_str(r#"{"errors":[{"message":"boom"}]}"#).expect("parse");
    assert!(parsed.data.is_none());
    assert_eq!(parsed.errors[0].message, "boom");
}
