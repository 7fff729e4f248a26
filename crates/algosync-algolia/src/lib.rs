pub mod client;
pub mod error;
pub mod grouping;
pub mod types;

pub use client::AlgoliaClient;
pub use error::AlgoliaError;
pub use grouping::{
    group_object_ids_by_index_name, group_products_by_index_name, group_variant_by_index_name,
};
