//! The upload pass.
//!
//! ## `Module::start`
//!
//! 1. Log the start event.
//! 2. Bind a trackor client to the configured trackor type.
//! 3. Read every trackor whose load flag is `"1"`, retrieving the file field.
//! 4. Per trackor, in fetch order: skip if no file, else upload, then clear
//!    the flag and write the file id back, then log success.
//! 5. A [`ModuleError`] inside step 4 is logged against that trackor and the
//!    pass moves on. Fetch, upload and log-sink failures abort the run.

use chrono::Utc;
use tracing::{debug, info};

use ovupload_core::{
    FileUploader, Filters, LogLevel, ModuleError, ModuleLog, Settings, Trackor, TrackorConnector,
    TrackorStore, TrackorType, UpdatePayload,
};

use crate::error::SyncError;
use crate::report::{RecordOutcome, SyncReport};

/// Load flag value marking a trackor as pending upload.
pub const PENDING_FLAG: &str = "1";

pub const STARTED_MESSAGE: &str = "Module is started";
pub const UPLOADED_MESSAGE: &str = "The file has been successfully uploaded";
pub const FAILED_MESSAGE: &str = "The file could not be uploaded";

/// Trackor type and field names the module operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    pub trackor_type: TrackorType,
    pub file_field: String,
    pub file_id_field: String,
    pub load_checkbox_field: String,
}

impl ModuleConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            trackor_type: settings.trackor_type.clone(),
            file_field: settings.file_field.clone(),
            file_id_field: settings.file_id_field.clone(),
            load_checkbox_field: settings.load_checkbox_field.clone(),
        }
    }
}

/// How a single trackor's processing ended badly.
enum RecordError {
    /// Logged against the trackor; the pass continues.
    Isolated(ModuleError),
    /// Aborts the pass.
    Fatal(SyncError),
}

impl From<ModuleError> for RecordError {
    fn from(err: ModuleError) -> Self {
        RecordError::Isolated(err)
    }
}

impl From<SyncError> for RecordError {
    fn from(err: SyncError) -> Self {
        RecordError::Fatal(err)
    }
}

pub struct Module<C, U, L> {
    config: ModuleConfig,
    connector: C,
    uploader: U,
    log: L,
}

impl<C, U, L> Module<C, U, L>
where
    C: TrackorConnector,
    U: FileUploader,
    L: ModuleLog,
{
    pub fn new(config: ModuleConfig, connector: C, uploader: U, log: L) -> Self {
        Self {
            config,
            connector,
            uploader,
            log,
        }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Run one pass. With `dry_run`, trackors are fetched and classified but
    /// nothing is uploaded or updated.
    pub fn start(&self, dry_run: bool) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        self.log.add(LogLevel::Info, STARTED_MESSAGE, "")?;

        let store = self.connector.configure(&self.config.trackor_type);
        let fields = vec![self.config.file_field.clone()];
        let filters = Filters::from([(
            self.config.load_checkbox_field.clone(),
            PENDING_FLAG.to_string(),
        )]);
        let trackors = store
            .read_by_filters(&fields, &filters)
            .map_err(SyncError::Fetch)?;
        info!(
            trackor_type = %self.config.trackor_type,
            count = trackors.len(),
            dry_run,
            "fetched trackors pending upload"
        );

        let mut outcomes = Vec::with_capacity(trackors.len());
        for trackor in trackors {
            let trackor_id = trackor.id;
            let outcome = match self.process(&store, &trackor, dry_run) {
                Ok(outcome) => outcome,
                Err(RecordError::Isolated(error)) => {
                    self.log.add(
                        LogLevel::Error,
                        FAILED_MESSAGE,
                        &format!("trackor_id={trackor_id}, error={error}"),
                    )?;
                    RecordOutcome::Failed {
                        trackor_id,
                        error: error.to_string(),
                    }
                }
                Err(RecordError::Fatal(error)) => return Err(error),
            };
            outcomes.push(outcome);
        }

        let report = SyncReport {
            dry_run,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        info!(
            fetched = report.fetched(),
            uploaded = report.uploaded(),
            skipped = report.skipped(),
            failed = report.failed(),
            "upload pass finished"
        );
        Ok(report)
    }

    fn process(
        &self,
        store: &C::Store,
        trackor: &Trackor,
        dry_run: bool,
    ) -> Result<RecordOutcome, RecordError> {
        let trackor_id = trackor.id;
        let Some(file) = trackor.file(&self.config.file_field)? else {
            debug!(%trackor_id, field = %self.config.file_field, "no file attached; skipping");
            return Ok(RecordOutcome::Skipped { trackor_id });
        };

        if dry_run {
            debug!(%trackor_id, file_name = ?file.file_name, "[dry-run] would upload");
            return Ok(RecordOutcome::WouldUpload {
                trackor_id,
                file_name: file.file_name,
            });
        }

        let file_id = self
            .uploader
            .upload_file(&file.data, file.file_name.as_deref())
            .map_err(|source| SyncError::Upload { trackor_id, source })?;
        drop(file);

        let payload = UpdatePayload::new(
            &self.config.load_checkbox_field,
            &self.config.file_id_field,
            file_id.clone(),
        );
        store.update_by_id(trackor_id, payload.fields())?;

        self.log
            .add(
                LogLevel::Info,
                UPLOADED_MESSAGE,
                &format!("trackor_id={trackor_id}, file_id={file_id}"),
            )
            .map_err(SyncError::from)?;
        Ok(RecordOutcome::Uploaded {
            trackor_id,
            file_id,
        })
    }
}
