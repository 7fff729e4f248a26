//! Admin endpoints for the full-catalog import.

use std::sync::Arc;

use algosync_backfill::{Backfill, BatchIndexer, ImportProgress, ProductSource, SaleorProducts};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{require_settings, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct ImportStatus {
    #[serde(flatten)]
    progress: ImportProgress,
    percent: u8,
}

impl From<ImportProgress> for ImportStatus {
    fn from(progress: ImportProgress) -> Self {
        let percent = progress.percent();
        Self { progress, percent }
    }
}

pub(super) async fn get_import_progress(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ImportStatus>> {
    let progress = state.import.borrow().clone();
    Json(ApiResponse {
        data: progress.into(),
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Starts an import in the background and returns immediately. Only one
/// import runs at a time per process.
pub(super) async fn start_import(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<(StatusCode, Json<ApiResponse<ImportStatus>>), ApiError> {
    let settings = require_settings(&state, &req_id.0).await?;
    let algolia = state.algolia_client(&settings).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("stored Algolia settings are unusable: {e}"),
        )
    })?;

    let claimed = state.import.send_if_modified(|progress| {
        if progress.phase.is_running() {
            return false;
        }
        *progress = ImportProgress::started();
        true
    });
    if !claimed {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "an import is already running",
        ));
    }

    let snapshot = state.import.borrow().clone();
    let source = SaleorProducts::new(Arc::clone(&state.saleor), state.config.products_page_size);
    let backfill = Backfill::new(source, algolia).with_batch_size(state.config.import_batch_size);

    tracing::info!(request_id = %req_id.0, "import started");
    spawn_import(backfill, Arc::clone(&state.import));

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: snapshot.into(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// Runs `backfill` on its own task. A second task awaits it and, if the run
/// panicked or was cancelled while still marked running, records `Failed` so
/// the next start request is not refused forever.
fn spawn_import<S, I>(
    backfill: Backfill<S, I>,
    progress: Arc<watch::Sender<ImportProgress>>,
) -> JoinHandle<()>
where
    S: ProductSource + Send + Sync + 'static,
    I: BatchIndexer + Send + Sync + 'static,
{
    let progress_tx = Arc::clone(&progress);
    let run = tokio::spawn(async move {
        let result = backfill
            .run(|snapshot| {
                progress_tx.send_replace(snapshot.clone());
            })
            .await;
        match result {
            Ok(done) => tracing::info!(
                products = done.products_imported,
                variants = done.variants_imported,
                "import finished"
            ),
            Err(e) => tracing::error!(error = %e, "import failed"),
        }
    });

    tokio::spawn(async move {
        let Err(e) = run.await else {
            return;
        };
        let message = if e.is_panic() {
            "import task panicked"
        } else {
            "import task was cancelled"
        };
        tracing::error!(error = %e, "{message}");
        progress.send_modify(|snapshot| {
            if snapshot.phase.is_running() {
                snapshot.fail(message.to_string());
            }
        });
    })
}
