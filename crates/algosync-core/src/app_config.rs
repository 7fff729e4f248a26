use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    /// Externally reachable base URL of this service, used to build webhook
    /// target URLs in the app manifest.
    pub public_url: String,
    pub log_level: String,
    /// GraphQL endpoint of the Saleor instance, e.g. `https://shop.example.com/graphql/`.
    pub saleor_api_url: String,
    /// App token issued by Saleor when the app was installed.
    pub saleor_app_token: String,
    /// Saleor's id for this app; private metadata is stored against it.
    pub saleor_app_id: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Number of products handed to the search provider per backfill batch.
    pub import_batch_size: usize,
    /// Page size for the paginated product query.
    pub products_page_size: u32,
    /// Replaces the Algolia hosts derived from the app id. Used for proxies and
    /// local mocks.
    pub algolia_host_override: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("public_url", &self.public_url)
            .field("log_level", &self.log_level)
            .field("saleor_api_url", &self.saleor_api_url)
            .field("saleor_app_token", &"[redacted]")
            .field("saleor_app_id", &self.saleor_app_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("import_batch_size", &self.import_batch_size)
            .field("products_page_size", &self.products_page_size)
            .field("algolia_host_override", &self.algolia_host_override)
            .finish()
    }
}
