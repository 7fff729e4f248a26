//! Algolia REST request and response bodies.
//!
//! Only the endpoints this service calls are modelled: `GET /1/indexes` and
//! `POST /1/indexes/{index}/batch`.

use serde::{Deserialize, Serialize};

/// Body of `POST /1/indexes/{index}/batch`.
#[derive(Debug, Serialize)]
pub struct BatchRequest {
    pub requests: Vec<BatchOperation>,
}

/// One write inside a batch.
#[derive(Debug, Serialize)]
pub struct BatchOperation {
    pub action: BatchAction,
    pub body: serde_json::Value,
}

/// Batch actions used by the sync.
///
/// `partialUpdateObject` creates the record when it does not exist yet, so
/// it doubles as an idempotent upsert keyed by `objectID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchAction {
    PartialUpdateObject,
    DeleteObject,
}

/// Response of a batch write. Algolia applies it asynchronously under
/// `task_id`.
#[derive(Debug, Deserialize)]
pub struct BatchResponse {
    #[serde(rename = "taskID")]
    pub task_id: i64,
    #[serde(rename = "objectIDs", default)]
    pub object_ids: Vec<String>,
}

/// Response of `GET /1/indexes`.
#[derive(Debug, Deserialize)]
pub struct ListIndicesResponse {
    #[serde(default)]
    pub items: Vec<IndexInfo>,
    #[serde(rename = "nbPages", default)]
    pub nb_pages: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    #[serde(default)]
    pub entries: i64,
}

/// Error body Algolia returns with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
