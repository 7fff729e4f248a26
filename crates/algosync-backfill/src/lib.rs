//! Full-catalog import from Saleor into Algolia.
//!
//! The orchestrator is generic over a [`ProductSource`] and a
//! [`BatchIndexer`]; [`SaleorProducts`] and `AlgoliaClient` are the production
//! implementations.

pub mod error;
pub mod progress;
pub mod runner;
pub mod sources;

pub use error::BackfillError;
pub use progress::{ImportPhase, ImportProgress};
pub use runner::{Backfill, DEFAULT_BATCH_SIZE};
pub use sources::{BatchIndexer, ProductSource, SaleorProducts};
