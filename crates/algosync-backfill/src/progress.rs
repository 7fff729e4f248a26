//! Import state as reported to operators.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle of one import run.
///
/// `Idle → FetchingAllProducts → Importing → Done`, or `Failed` from either
/// active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportPhase {
    #[default]
    Idle,
    FetchingAllProducts,
    Importing,
    Done,
    Failed,
}

impl ImportPhase {
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::FetchingAllProducts | Self::Importing)
    }
}

/// Snapshot of an import run. Progress is counted in variants, since each
/// variant becomes one search document per channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgress {
    pub phase: ImportPhase,
    pub products_total: usize,
    pub products_imported: usize,
    pub variants_total: usize,
    pub variants_imported: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ImportProgress {
    /// A fresh run that has just begun fetching.
    #[must_use]
    pub fn started() -> Self {
        Self {
            phase: ImportPhase::FetchingAllProducts,
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Marks the run failed with `message`.
    pub fn fail(&mut self, message: String) {
        self.phase = ImportPhase::Failed;
        self.error = Some(message);
        self.finished_at = Some(Utc::now());
    }

    pub(crate) fn finish(&mut self) {
        self.phase = ImportPhase::Done;
        self.finished_at = Some(Utc::now());
    }

    /// Whole-number percentage of variants imported; 100 for an empty catalog
    /// once done.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.variants_total == 0 {
            return if self.phase == ImportPhase::Done { 100 } else { 0 };
        }
        let pct = self.variants_imported.saturating_mul(100) / self.variants_total;
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}
