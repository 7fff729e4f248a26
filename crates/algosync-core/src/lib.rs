pub mod app_config;
pub mod catalog;
pub mod category;
pub mod config;
pub mod document;
pub mod index_name;
pub mod settings;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    AttributeRef, AttributeValue, Category, Channel, ChannelListing, Image, Media, MetadataItem,
    Money, NamedRef, Product, ProductVariantPayload, SelectedAttribute, Variant,
};
pub use category::category_hierarchical_facets;
pub use config::{load_app_config, load_app_config_from_env};
pub use document::{object_id, product_and_variant_to_document, MediaDocument, SearchDocument};
pub use index_name::channel_index_name;
pub use settings::AlgoliaSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
