use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaleorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The GraphQL response carried top-level `errors`, or no `data`.
    #[error("GraphQL error in {operation}: {message}")]
    GraphQl { operation: String, message: String },

    /// A mutation completed but reported field errors in its payload.
    #[error("{operation} rejected: {message}")]
    Mutation { operation: String, message: String },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid Saleor API URL \"{url}\": {reason}")]
    InvalidApiUrl { url: String, reason: String },
}
