use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum BackfillError {
    #[error("fetching products failed: {0}")]
    Fetch(#[source] BoxError),

    /// A batch call failed; batches before it were written, later ones were
    /// never sent.
    #[error("importing batch {batch} of {total_batches} failed: {source}")]
    Import {
        batch: usize,
        total_batches: usize,
        #[source]
        source: BoxError,
    },
}
