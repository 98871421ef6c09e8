//! Per-trackor outcomes and the run report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ovupload_core::TrackorId;

/// What happened to one fetched trackor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// File uploaded, flag cleared and file id written back.
    Uploaded { trackor_id: TrackorId, file_id: String },
    /// Dry run: the file *would* have been uploaded.
    WouldUpload {
        trackor_id: TrackorId,
        file_name: Option<String>,
    },
    /// Flag set but no file attached; left untouched.
    Skipped { trackor_id: TrackorId },
    /// A record-service error was logged; the flag stays set for the next run.
    Failed { trackor_id: TrackorId, error: String },
}

impl RecordOutcome {
    pub fn trackor_id(&self) -> TrackorId {
        match self {
            RecordOutcome::Uploaded { trackor_id, .. }
            | RecordOutcome::WouldUpload { trackor_id, .. }
            | RecordOutcome::Skipped { trackor_id }
            | RecordOutcome::Failed { trackor_id, .. } => *trackor_id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordOutcome::Uploaded { .. } => "uploaded",
            RecordOutcome::WouldUpload { .. } => "would upload",
            RecordOutcome::Skipped { .. } => "skipped",
            RecordOutcome::Failed { .. } => "failed",
        }
    }
}

/// Summary of one [`crate::Module::start`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<RecordOutcome>,
}

impl SyncReport {
    pub fn fetched(&self) -> usize {
        self.outcomes.len()
    }

    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Uploaded { .. }))
    }

    pub fn would_upload(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::WouldUpload { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}
