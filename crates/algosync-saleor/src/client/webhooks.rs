//! Toggling the app's own webhooks.

use serde_json::json;

use crate::error::SaleorError;
use crate::queries::WEBHOOK_UPDATE_MUTATION;
use crate::types::WebhookUpdateData;

use super::SaleorClient;

impl SaleorClient {
    /// Lists the ids of the app's webhooks.
    ///
    /// # Errors
    ///
    /// Propagates GraphQL and transport errors.
    pub async fn fetch_own_webhook_ids(&self) -> Result<Vec<String>, SaleorError> {
        let app = self.fetch_own_app().await?;
        Ok(app
            .webhooks
            .unwrap_or_default()
            .into_iter()
            .map(|w| w.id)
            .collect())
    }

    /// Deactivates every webhook of the app.
    ///
    /// Uses `webhook_ids` when the caller already has them (webhook payloads
    /// carry `recipient.webhooks`); otherwise fetches the list first.
    ///
    /// # Errors
    ///
    /// Returns the first failing `webhookUpdate` call.
    pub async fn disable_own_webhooks(
        &self,
        webhook_ids: Option<Vec<String>>,
    ) -> Result<(), SaleorError> {
        let ids = match webhook_ids {
            Some(ids) => ids,
            None => self.fetch_own_webhook_ids().await?,
        };
        self.set_webhooks_active(&ids, false).await
    }

    /// Activates every webhook of the app. Called once settings are saved and
    /// verified.
    ///
    /// # Errors
    ///
    /// Returns the first failing call.
    pub async fn enable_own_webhooks(&self) -> Result<(), SaleorError> {
        let ids = self.fetch_own_webhook_ids().await?;
        self.set_webhooks_active(&ids, true).await
    }

    async fn set_webhooks_active(&self, ids: &[String], is_active: bool) -> Result<(), SaleorError> {
        for id in ids {
            let data: WebhookUpdateData = self
                .execute(
                    "SetWebhookActive",
                    WEBHOOK_UPDATE_MUTATION,
                    json!({ "id": id, "isActive": is_active }),
                )
                .await?;

            if let Some(message) = data.webhook_update.and_then(|p| p.error_message()) {
                return Err(SaleorError::Mutation {
                    operation: format!("webhookUpdate({id})"),
                    message,
                });
            }
        }

        tracing::info!(
            domain = %self.auth.domain(),
            webhooks = ids.len(),
            is_active,
            "updated webhook activity"
        );
        Ok(())
    }
}
