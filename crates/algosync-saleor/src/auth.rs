//! Credentials for talking to one Saleor instance.

use algosync_core::AppConfig;

/// The app's credentials for a Saleor instance: API URL, app token, and the
/// app id Saleor assigned on install.
#[derive(Clone)]
pub struct AuthData {
    pub saleor_api_url: String,
    pub token: String,
    pub app_id: String,
}

impl AuthData {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            saleor_api_url: config.saleor_api_url.clone(),
            token: config.saleor_app_token.clone(),
            app_id: config.saleor_app_id.clone(),
        }
    }

    /// Hostname of the Saleor instance, for logs and error messages.
    ///
    /// Falls back to the full URL string if parsing fails.
    #[must_use]
    pub fn domain(&self) -> String {
        reqwest::Url::parse(&self.saleor_api_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_else(|| self.saleor_api_url.clone())
    }

    /// `true` when `api_url` names this instance. Trailing slashes are ignored
    /// because Saleor sends `.../graphql/` while operators often configure
    /// `.../graphql`.
    #[must_use]
    pub fn matches_api_url(&self, api_url: &str) -> bool {
        self.saleor_api_url.trim_end_matches('/') == api_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for AuthData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthData")
            .field("saleor_api_url", &self.saleor_api_url)
            .field("token", &"[redacted]")
            .field("app_id", &self.app_id)
            .finish()
    }
}
