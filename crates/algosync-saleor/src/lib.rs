pub mod auth;
pub mod client;
pub mod error;
pub mod pagination;
pub mod queries;
pub mod signature;
pub mod types;

pub use auth::AuthData;
pub use client::SaleorClient;
pub use error::SaleorError;
pub use signature::{verify_webhook_signature, JwkSet, SignatureError};
