//! Algolia settings stored in the app's private metadata.

use algosync_core::{AlgoliaSettings, MetadataItem};
use serde_json::json;

use crate::error::SaleorError;
use crate::queries::{OWN_APP_QUERY, UPDATE_PRIVATE_METADATA_MUTATION};
use crate::types::{OwnApp, OwnAppData, UpdatePrivateMetadataData};

use super::SaleorClient;

const APP_ID_KEY: &str = "appId";
const SECRET_KEY_KEY: &str = "secretKey";
const INDEX_NAME_PREFIX_KEY: &str = "indexNamePrefix";

impl SaleorClient {
    pub(super) async fn fetch_own_app(&self) -> Result<OwnApp, SaleorError> {
        let data: OwnAppData = self
            .execute("OwnApp", OWN_APP_QUERY, json!({}))
            .await?;
        data.app.ok_or_else(|| SaleorError::GraphQl {
            operation: "OwnApp".to_string(),
            message: "app token did not resolve to an app".to_string(),
        })
    }

    /// Reads the stored Algolia settings.
    ///
    /// Returns `Ok(None)` when the app id or secret key has never been saved.
    ///
    /// # Errors
    ///
    /// Propagates GraphQL and transport errors.
    pub async fn fetch_settings(&self) -> Result<Option<AlgoliaSettings>, SaleorError> {
        let app = self.fetch_own_app().await?;
        Ok(settings_from_metadata(&app.private_metadata))
    }

    /// Writes `settings` into the app's private metadata.
    ///
    /// # Errors
    ///
    /// - [`SaleorError::Mutation`] if Saleor rejects the update.
    /// - Any GraphQL or transport error.
    pub async fn save_settings(&self, settings: &AlgoliaSettings) -> Result<(), SaleorError> {
        let input = json!([
            { "key": APP_ID_KEY, "value": settings.app_id },
            { "key": SECRET_KEY_KEY, "value": settings.secret_key },
            {
                "key": INDEX_NAME_PREFIX_KEY,
                "value": settings.index_name_prefix.as_deref().unwrap_or_default()
            },
        ]);
        let data: UpdatePrivateMetadataData = self
            .execute(
                "UpdateAppPrivateMetadata",
                UPDATE_PRIVATE_METADATA_MUTATION,
                json!({ "id": self.auth.app_id, "input": input }),
            )
            .await?;

        if let Some(message) = data
            .update_private_metadata
            .and_then(|payload| payload.error_message())
        {
            return Err(SaleorError::Mutation {
                operation: "updatePrivateMetadata".to_string(),
                message,
            });
        }

        tracing::info!(domain = %self.auth.domain(), "saved Algolia settings");
        Ok(())
    }
}

/// Builds settings from metadata entries. Missing or blank app id or secret
/// key means "not configured"; a blank prefix means no prefix.
fn settings_from_metadata(items: &[MetadataItem]) -> Option<AlgoliaSettings> {
    let lookup = |key: &str| {
        items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let settings = AlgoliaSettings {
        app_id: lookup(APP_ID_KEY)?,
        secret_key: lookup(SECRET_KEY_KEY)?,
        index_name_prefix: lookup(INDEX_NAME_PREFIX_KEY),
    };
    Some(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, value: &str) -> MetadataItem {
        MetadataItem {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn complete_metadata_yields_settings() {
        let settings = settings_from_metadata(&[
            item("appId", "APP"),
            item("secretKey", "key"),
            item("indexNamePrefix", "shop"),
            item("unrelated", "x"),
        ])
        .expect("settings");
        assert_eq!(settings.app_id, "APP");
        assert_eq!(settings.secret_key, "key");
        assert_eq!(settings.index_name_prefix.as_deref(), Some("shop"));
    }

    #[test]
    fn blank_prefix_is_none() {
        let settings = settings_from_metadata(&[
            item("appId", "APP"),
            item("secretKey", "key"),
            item("indexNamePrefix", ""),
        ])
        .expect("settings");
        assert!(settings.index_name_prefix.is_none());
    }

    #[test]
    fn missing_secret_is_not_configured() {
        assert!(settings_from_metadata(&[item("appId", "APP")]).is_none());
    }

    #[test]
    fn blank_app_id_is_not_configured() {
        assert!(settings_from_metadata(&[item("appId", "  "), item("secretKey", "key")]).is_none());
    }
}
