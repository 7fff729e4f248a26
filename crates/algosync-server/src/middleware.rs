//! Request middleware: request ids, admin bearer keys, and Saleor webhook
//! signatures.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use algosync_saleor::{verify_webhook_signature, JwkSet, SaleorClient, SaleorError, SignatureError};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";
pub(crate) const SALEOR_SIGNATURE_HEADER: &str = "saleor-signature";

/// Largest webhook body buffered for signature checks.
const WEBHOOK_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Minimum age of the cached key set before an unknown `kid` triggers a
/// refetch. Bounds how often forged signatures can make us call Saleor.
const KEY_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Request id carried as a request extension and echoed in responses.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

/// Reuses the caller's `x-request-id` or mints a UUID.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = match req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        Some(id) => id.to_owned(),
        None => Uuid::new_v4().to_string(),
    };
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Bearer keys accepted on the admin routes.
#[derive(Debug, Clone)]
pub struct AdminKeys {
    keys: Arc<[String]>,
}

impl AdminKeys {
    /// Reads `ALGOSYNC_API_KEYS` (comma-separated).
    ///
    /// # Errors
    ///
    /// See [`AdminKeys::from_keys`].
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("ALGOSYNC_API_KEYS").unwrap_or_default();
        Self::from_keys(&raw, is_development)
    }

    /// An empty list leaves the admin routes open, which is only allowed in
    /// development.
    ///
    /// # Errors
    ///
    /// Fails when no key is given outside development.
    pub fn from_keys(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        keys.sort_unstable();
        keys.dedup();

        if keys.is_empty() {
            anyhow::ensure!(
                is_development,
                "ALGOSYNC_API_KEYS must list at least one admin key outside development"
            );
            tracing::warn!("ALGOSYNC_API_KEYS is empty; admin routes are open");
        }

        Ok(Self { keys: keys.into() })
    }

    pub fn is_open(&self) -> bool {
        self.keys.is_empty()
    }

    fn accepts(&self, token: &str) -> bool {
        self.keys
            .iter()
            .any(|key| bool::from(key.as_bytes().ct_eq(token.as_bytes())))
    }
}

/// Rejects admin requests without an accepted bearer key.
pub async fn require_admin_key(
    State(keys): State<AdminKeys>,
    req: Request,
    next: Next,
) -> Response {
    if keys.is_open() {
        return next.run(req).await;
    }

    match bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if keys.accepts(token) => next.run(req).await,
        _ => ApiError::new(
            request_id_of(&req),
            "unauthorized",
            "missing or invalid bearer token",
        )
        .into_response(),
    }
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    let token = value?.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[derive(Debug, Default)]
struct KeyCache {
    keys: Option<JwkSet>,
    fetched_at: Option<Instant>,
}

/// The configured Saleor instance's webhook signing keys, fetched on first
/// use and refetched when a signature names a key we have not seen.
#[derive(Clone)]
pub struct WebhookKeys {
    saleor: Arc<SaleorClient>,
    cache: Arc<RwLock<KeyCache>>,
}

#[derive(Debug)]
enum SignatureRejection {
    Invalid(SignatureError),
    KeysUnavailable(SaleorError),
}

impl WebhookKeys {
    #[must_use]
    pub fn new(saleor: Arc<SaleorClient>) -> Self {
        Self {
            saleor,
            cache: Arc::new(RwLock::new(KeyCache::default())),
        }
    }

    async fn verify(&self, signature: &str, body: &[u8]) -> Result<(), SignatureRejection> {
        let (keys, just_fetched) = self.current().await?;
        let outcome = verify_webhook_signature(signature, body, &keys);

        if let Err(SignatureError::UnknownKey(_)) = &outcome {
            if !just_fetched && self.is_stale().await {
                tracing::info!("webhook signed with unknown key; refetching JWKS");
                let keys = self.refresh().await?;
                return verify_webhook_signature(signature, body, &keys)
                    .map_err(SignatureRejection::Invalid);
            }
        }
        outcome.map_err(SignatureRejection::Invalid)
    }

    async fn current(&self) -> Result<(JwkSet, bool), SignatureRejection> {
        let cached = self.cache.read().await.keys.clone();
        match cached {
            Some(keys) => Ok((keys, false)),
            None => Ok((self.refresh().await?, true)),
        }
    }

    async fn is_stale(&self) -> bool {
        self.cache
            .read()
            .await
            .fetched_at
            .is_none_or(|at| at.elapsed() >= KEY_REFRESH_INTERVAL)
    }

    async fn refresh(&self) -> Result<JwkSet, SignatureRejection> {
        let keys = self
            .saleor
            .fetch_jwks()
            .await
            .map_err(SignatureRejection::KeysUnavailable)?;
        let mut cache = self.cache.write().await;
        cache.keys = Some(keys.clone());
        cache.fetched_at = Some(Instant::now());
        Ok(keys)
    }

    #[cfg(test)]
    pub(crate) async fn seed(&self, keys: JwkSet, fetched_at: Instant) {
        let mut cache = self.cache.write().await;
        cache.keys = Some(keys);
        cache.fetched_at = Some(fetched_at);
    }
}

/// Verifies `saleor-signature` over the raw body before the webhook handler
/// runs. Unsigned or mis-signed deliveries get 401.
pub async fn verify_saleor_signature(
    State(keys): State<WebhookKeys>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = request_id_of(&req);
    let (parts, body) = req.into_parts();

    let Some(signature) = parts
        .headers
        .get(SALEOR_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned)
    else {
        return ApiError::new(request_id, "unauthorized", "missing saleor-signature header")
            .into_response();
    };

    let bytes = match to_bytes(body, WEBHOOK_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return ApiError::new(request_id, "bad_request", format!("unreadable body: {e}"))
                .into_response();
        }
    };

    match keys.verify(&signature, &bytes).await {
        Ok(()) => next.run(Request::from_parts(parts, Body::from(bytes))).await,
        Err(SignatureRejection::Invalid(e)) => {
            tracing::warn!(error = %e, path = %parts.uri.path(), "rejected webhook signature");
            ApiError::new(request_id, "unauthorized", "invalid webhook signature").into_response()
        }
        Err(SignatureRejection::KeysUnavailable(e)) => {
            tracing::error!(error = %e, "could not load Saleor signing keys");
            ApiError::new(
                request_id,
                "upstream_error",
                "cannot verify webhook signature right now",
            )
            .into_response()
        }
    }
}
