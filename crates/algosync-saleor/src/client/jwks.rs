//! Public signing keys of the Saleor instance.

use crate::error::SaleorError;
use crate::signature::JwkSet;

use super::SaleorClient;

const JWKS_PATH: &str = "/.well-known/jwks.json";

impl SaleorClient {
    /// Fetches the key set Saleor signs webhook payloads with. The endpoint is
    /// public, so no token is sent.
    ///
    /// # Errors
    ///
    /// - [`SaleorError::UnexpectedStatus`] on any non-2xx status.
    /// - [`SaleorError::Deserialize`] if the body is not a JWK set.
    /// - [`SaleorError::Http`] on network failure.
    pub async fn fetch_jwks(&self) -> Result<JwkSet, SaleorError> {
        let url = self
            .api_url
            .join(JWKS_PATH)
            .map_err(|e| SaleorError::InvalidApiUrl {
                url: self.auth.saleor_api_url.clone(),
                reason: e.to_string(),
            })?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SaleorError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let keys: JwkSet = serde_json::from_str(&body).map_err(|e| SaleorError::Deserialize {
            context: format!("JWKS from {}", self.auth.domain()),
            source: e,
        })?;
        tracing::debug!(keys = keys.keys.len(), domain = %self.auth.domain(), "fetched Saleor JWKS");
        Ok(keys)
    }
}
