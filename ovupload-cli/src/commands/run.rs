//! `ovupload run`: one upload pass.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use ovupload_core::{settings, ModuleLog, TracingLog};
use ovupload_onevizion::{IntegrationLog, OneVizionConnector};
use ovupload_openai::OpenAiUploader;
use ovupload_sync::{Module, ModuleConfig, RecordOutcome, SyncReport};

/// Arguments for `ovupload run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to settings.json.
    #[arg(long, default_value = "settings.json")]
    pub settings: PathBuf,

    /// Path to ihub_parameters.json; enables the OneVizion integration log.
    #[arg(long)]
    pub ihub_parameters: Option<PathBuf>,

    /// Fetch and classify trackors without uploading or updating anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Override the OneVizion base URL (default: https://{ovUrl}).
    #[arg(long, value_name = "URL")]
    pub ov_base_url: Option<String>,

    /// Override the OpenAI API root (default: https://api.openai.com/v1).
    #[arg(long, value_name = "URL")]
    pub openai_api_url: Option<String>,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let settings = settings::load_settings(&self.settings)
            .with_context(|| format!("failed to load settings from {}", self.settings.display()))?;
        tracing::debug!(?settings, "settings loaded");
        let access = settings.access_parameters();

        let log: Box<dyn ModuleLog> = match &self.ihub_parameters {
            Some(path) => {
                let params = settings::load_ihub_parameters(path).with_context(|| {
                    format!("failed to load ihub parameters from {}", path.display())
                })?;
                let mut log = IntegrationLog::new(&access, params.process_id, params.log_level);
                if let Some(url) = &self.ov_base_url {
                    log = log.with_base_url(url);
                }
                Box::new(log)
            }
            None => Box::new(TracingLog),
        };

        let mut connector = OneVizionConnector::new(&access);
        if let Some(url) = &self.ov_base_url {
            connector = connector.with_base_url(url);
        }
        let mut uploader = OpenAiUploader::new(settings.openai_api_key.clone());
        if let Some(url) = &self.openai_api_url {
            uploader = uploader.with_api_url(url);
        }

        let module = Module::new(
            ModuleConfig::from_settings(&settings),
            connector,
            uploader,
            log,
        );
        let report = module
            .start(self.dry_run)
            .with_context(|| format!("upload run failed for trackor type '{}'", settings.trackor_type))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize run report")?
            );
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "trackor")]
    trackor_id: i64,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let elapsed_ms = (report.finished_at - report.started_at).num_milliseconds();

    let headline = format!(
        "{prefix}{} fetched, {} uploaded, {} skipped, {} failed ({elapsed_ms} ms)",
        report.fetched(),
        if report.dry_run {
            report.would_upload()
        } else {
            report.uploaded()
        },
        report.skipped(),
        report.failed(),
    );
    if report.failed() > 0 {
        println!("{} {headline}", "✗".red().bold());
    } else {
        println!("{} {headline}", "✓".green().bold());
    }

    if report.outcomes.is_empty() {
        println!("No trackors flagged for upload.");
        return;
    }

    let rows: Vec<OutcomeRow> = report
        .outcomes
        .iter()
        .map(|outcome| OutcomeRow {
            trackor_id: outcome.trackor_id().0,
            status: outcome.label().to_string(),
            detail: outcome_detail(outcome),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn outcome_detail(outcome: &RecordOutcome) -> String {
    match outcome {
        RecordOutcome::Uploaded { file_id, .. } => format!("file_id={file_id}"),
        RecordOutcome::WouldUpload { file_name, .. } => {
            format!("file_name={}", file_name.as_deref().unwrap_or("-"))
        }
        RecordOutcome::Skipped { .. } => "no file attached".to_string(),
        RecordOutcome::Failed { error, .. } => error.clone(),
    }
}
