//! Error types for ovupload-sync.

use thiserror::Error;

use ovupload_core::{LogError, ModuleError, TrackorId, UploadError};

/// Failures that abort a run.
///
/// Per-trackor [`ModuleError`]s raised after the initial fetch are logged
/// and never surface here.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The initial read of flagged trackors failed.
    #[error("failed to fetch trackors: {0}")]
    Fetch(#[source] ModuleError),

    /// The upload service rejected or never answered an upload.
    #[error("upload failed for trackor {trackor_id}: {source}")]
    Upload {
        trackor_id: TrackorId,
        #[source]
        source: UploadError,
    },

    /// The module log sink itself failed.
    #[error("module log error: {0}")]
    Log(#[from] LogError),
}
