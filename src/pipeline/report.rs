use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::services::ImportReport;

/// Retention sweep outcome. Best effort; an error here never blocks the
/// rest of the run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub items_deleted: usize,
    pub digests_deleted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportStageReport {
    /// None when no subscriber CSV is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ImportReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceIngest {
    pub fetched: usize,
    pub inserted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub sources: BTreeMap<String, SourceIngest>,
}

impl IngestReport {
    pub fn total_inserted(&self) -> usize {
        self.sources.values().map(|s| s.inserted).sum()
    }

    pub fn failed_sources(&self) -> usize {
        self.sources.values().filter(|s| s.error.is_some()).count()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichReport {
    pub derived: usize,
    pub unavailable: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DigestReport {
    pub created: usize,
    pub failed: usize,
    /// Set when the stage could not run at all (no summarizer configured).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
    /// "nothing to send" or a stage-fatal condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated outcome of one pipeline run. Serialized into logs and into
/// the manual-trigger response body.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sweep: SweepReport,
    pub import: ImportStageReport,
    pub ingest: IngestReport,
    pub enrich: EnrichReport,
    pub digest: DigestReport,
    pub delivery: DeliveryReport,
    pub success: bool,
}

impl RunSummary {
    /// A run succeeds when no stage hit a stage-fatal error. Per-item and
    /// per-source failures degrade the run but do not fail it.
    pub fn compute_success(&mut self) {
        self.success = self.sweep.error.is_none()
            && self.import.error.is_none()
            && self.digest.error.is_none()
            && self.delivery.error.is_none();
    }
}
