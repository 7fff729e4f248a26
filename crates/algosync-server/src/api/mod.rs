mod configuration;
mod import;
mod manifest;
mod webhooks;

use std::sync::Arc;

use algosync_algolia::{AlgoliaClient, AlgoliaError};
use algosync_backfill::ImportProgress;
use algosync_core::{AlgoliaSettings, AppConfig};
use algosync_saleor::SaleorClient;
use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    request_id, require_admin_key, verify_saleor_signature, AdminKeys, RequestId, WebhookKeys,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub saleor: Arc<SaleorClient>,
    /// Latest snapshot of the current or most recent import.
    pub import: Arc<watch::Sender<ImportProgress>>,
    pub webhook_keys: WebhookKeys,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, saleor: Arc<SaleorClient>) -> Self {
        let (import, _) = watch::channel(ImportProgress::default());
        Self {
            config,
            webhook_keys: WebhookKeys::new(Arc::clone(&saleor)),
            saleor,
            import: Arc::new(import),
        }
    }

    pub(super) fn algolia_client(
        &self,
        settings: &AlgoliaSettings,
    ) -> Result<AlgoliaClient, AlgoliaError> {
        AlgoliaClient::from_app_config(settings, &self.config)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    saleor: &'static str,
    algolia_settings: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" | "not_configured" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_saleor_error(request_id: String, error: &algosync_saleor::SaleorError) -> ApiError {
    tracing::error!(error = %error, "Saleor request failed");
    ApiError::new(request_id, "upstream_error", "Saleor request failed")
}

/// Reads the stored Algolia settings, mapping "never saved" to a
/// `not_configured` error.
pub(super) async fn require_settings(
    state: &AppState,
    request_id: &str,
) -> Result<AlgoliaSettings, ApiError> {
    match state.saleor.fetch_settings().await {
        Ok(Some(settings)) => Ok(settings),
        Ok(None) => Err(ApiError::new(
            request_id,
            "not_configured",
            "Algolia settings are not configured",
        )),
        Err(e) => Err(map_saleor_error(request_id.to_owned(), &e)),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn admin_router(keys: AdminKeys) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/configuration",
            get(configuration::get_configuration).post(configuration::save_configuration),
        )
        .route(
            "/api/v1/import",
            get(import::get_import_progress).post(import::start_import),
        )
        .route_layer(axum::middleware::from_fn_with_state(keys, require_admin_key))
}

pub fn build_app(state: AppState, admin_keys: AdminKeys) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/manifest", get(manifest::get_manifest));

    // Saleor cannot send a bearer token; deliveries carry a JWS signature.
    let webhook_routes = Router::new()
        .route("/api/webhooks/saleor/{event}", post(webhooks::handle_webhook))
        .route_layer(axum::middleware::from_fn_with_state(
            state.webhook_keys.clone(),
            verify_saleor_signature,
        ));

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .merge(admin_router(admin_keys))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.saleor.fetch_settings().await {
        Ok(settings) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    saleor: "ok",
                    algolia_settings: if settings.is_some() {
                        "configured"
                    } else {
                        "not_configured"
                    },
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: Saleor unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        saleor: "unavailable",
                        algolia_settings: "unknown",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests {
    use super::test_support::{json_body, own_app_response, test_app, TestServers};
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, ResponseTemplate};

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "upstream_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_reports_configured_settings() {
        let servers = TestServers::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("query OwnApp"))
            .respond_with(own_app_response(true, &[]))
            .mount(&servers.saleor)
            .await;

        let response = test_app(&servers, None)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["algolia_settings"], "configured");
    }

    #[tokio::test]
    async fn health_is_degraded_when_saleor_is_down() {
        let servers = TestServers::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&servers.saleor)
            .await;

        let response = test_app(&servers, None)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = json_body(response).await;
        assert_eq!(json["data"]["saleor"], "unavailable");
    }

    #[tokio::test]
    async fn admin_routes_require_bearer_token() {
        let servers = TestServers::start().await;

        let response = test_app(&servers, Some("secret-key"))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/import")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_routes_accept_configured_bearer_token() {
        let servers = TestServers::start().await;

        let response = test_app(&servers, Some("secret-key"))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/import")
                    .header("authorization", "Bearer secret-key")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
