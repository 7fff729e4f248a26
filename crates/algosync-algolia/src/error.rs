use thiserror::Error;

/// Errors returned by the Algolia REST client.
#[derive(Debug, Error)]
pub enum AlgoliaError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Algolia answered with a non-2xx status. `message` is taken from the
    /// JSON error body when present.
    #[error("Algolia API error {status} for {operation}: {message}")]
    Api {
        status: u16,
        operation: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// App id or API key cannot be sent as HTTP header values.
    #[error("invalid Algolia credentials: {0}")]
    InvalidCredentials(String),
}
