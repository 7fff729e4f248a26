//! Clients shared by every command.

use std::sync::Arc;

use algosync_algolia::AlgoliaClient;
use algosync_core::{AlgoliaSettings, AppConfig};
use algosync_saleor::{AuthData, SaleorClient};

pub(crate) struct CliContext {
    pub config: AppConfig,
    pub saleor: Arc<SaleorClient>,
}

impl CliContext {
    pub(crate) fn new(config: AppConfig) -> anyhow::Result<Self> {
        let saleor = SaleorClient::new(
            AuthData::from_config(&config),
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self {
            config,
            saleor: Arc::new(saleor),
        })
    }

    /// Stored Algolia settings; an error when none have been saved yet.
    pub(crate) async fn require_settings(&self) -> anyhow::Result<AlgoliaSettings> {
        self.saleor.fetch_settings().await?.ok_or_else(|| {
            anyhow::anyhow!(
                "Algolia settings are not configured for {}; save them via POST /api/v1/configuration",
                self.saleor.auth().domain()
            )
        })
    }

    pub(crate) fn algolia_client(&self, settings: &AlgoliaSettings) -> anyhow::Result<AlgoliaClient> {
        Ok(AlgoliaClient::from_app_config(settings, &self.config)?)
    }
}
