//! `ovupload check-settings`: validate settings files offline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ovupload_core::settings;

/// Arguments for `ovupload check-settings`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to settings.json.
    #[arg(long, default_value = "settings.json")]
    pub settings: PathBuf,

    /// Path to ihub_parameters.json.
    #[arg(long)]
    pub ihub_parameters: Option<PathBuf>,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let settings = settings::load_settings(&self.settings)
            .with_context(|| format!("failed to load settings from {}", self.settings.display()))?;
        let access = settings.access_parameters();

        println!("{} {}", "✓".green().bold(), self.settings.display());
        println!("  host:          {}", access.host);
        println!("  trackor type:  {}", settings.trackor_type);
        println!("  file field:    {}", settings.file_field);
        println!("  file id field: {}", settings.file_id_field);
        println!("  load flag:     {}", settings.load_checkbox_field);

        if let Some(path) = &self.ihub_parameters {
            let params = settings::load_ihub_parameters(path).with_context(|| {
                format!("failed to load ihub parameters from {}", path.display())
            })?;
            println!("{} {}", "✓".green().bold(), path.display());
            println!("  process id:    {}", params.process_id);
            println!("  log level:     {}", params.log_level);
        }
        Ok(())
    }
}
