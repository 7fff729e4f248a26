//! Admin endpoints for the Algolia settings.

use algosync_core::AlgoliaSettings;
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use super::{map_saleor_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ConfigurationView {
    /// `true` only when settings exist and Algolia accepted them just now.
    configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_id: Option<String>,
    /// Last four characters only.
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index_name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ConfigurationView {
    fn not_configured() -> Self {
        Self {
            configured: false,
            app_id: None,
            secret_key: None,
            index_name_prefix: None,
            error: None,
        }
    }

    fn from_settings(settings: &AlgoliaSettings, ping_error: Option<String>) -> Self {
        Self {
            configured: ping_error.is_none(),
            app_id: Some(settings.app_id.clone()),
            secret_key: Some(settings.masked_secret_key()),
            index_name_prefix: settings.index_name_prefix.clone(),
            error: ping_error,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SaveConfigurationRequest {
    app_id: String,
    secret_key: String,
    #[serde(default)]
    index_name_prefix: Option<String>,
}

impl SaveConfigurationRequest {
    fn into_settings(self) -> AlgoliaSettings {
        AlgoliaSettings {
            app_id: self.app_id.trim().to_owned(),
            secret_key: self.secret_key.trim().to_owned(),
            index_name_prefix: self
                .index_name_prefix
                .map(|p| p.trim().to_owned())
                .filter(|p| !p.is_empty()),
        }
    }
}

/// Reports whether stored settings exist and still work.
pub(super) async fn get_configuration(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ConfigurationView>>, ApiError> {
    let settings = state
        .saleor
        .fetch_settings()
        .await
        .map_err(|e| map_saleor_error(req_id.0.clone(), &e))?;

    let view = match settings {
        None => ConfigurationView::not_configured(),
        Some(settings) => {
            let ping_error = ping(&state, &settings).await.err();
            ConfigurationView::from_settings(&settings, ping_error)
        }
    };

    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Saves settings, verifies them against Algolia, and on success switches the
/// app's webhooks on.
pub(super) async fn save_configuration(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SaveConfigurationRequest>,
) -> Result<Json<ApiResponse<ConfigurationView>>, ApiError> {
    let settings = body.into_settings();
    if !settings.is_complete() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "appId and secretKey are required",
        ));
    }

    state
        .saleor
        .save_settings(&settings)
        .await
        .map_err(|e| map_saleor_error(req_id.0.clone(), &e))?;

    if let Err(message) = ping(&state, &settings).await {
        tracing::warn!(app_id = %settings.app_id, error = %message, "saved settings failed Algolia check");
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            format!("settings saved but Algolia rejected them: {message}"),
        ));
    }

    state
        .saleor
        .enable_own_webhooks()
        .await
        .map_err(|e| map_saleor_error(req_id.0.clone(), &e))?;

    tracing::info!(app_id = %settings.app_id, "Algolia configured; webhooks enabled");
    Ok(Json(ApiResponse {
        data: ConfigurationView::from_settings(&settings, None),
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn ping(state: &AppState, settings: &AlgoliaSettings) -> Result<(), String> {
    let client = state.algolia_client(settings).map_err(|e| e.to_string())?;
    client.ping().await.map(|_| ()).map_err(|e| e.to_string())
}
