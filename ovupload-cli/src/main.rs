//! ovupload: push OneVizion EFile attachments to the OpenAI Files API.
//!
//! # Usage
//!
//! ```text
//! ovupload run [--settings settings.json] [--ihub-parameters ihub_parameters.json] [--dry-run] [--json]
//! ovupload check-settings [--settings settings.json] [--ihub-parameters ihub_parameters.json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ovupload",
    version,
    about = "Upload files flagged on OneVizion trackors to OpenAI and write back the file ids",
    long_about = None,
)]
struct Cli {
    /// Emit tracing output as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one upload pass over every flagged trackor.
    Run(RunArgs),

    /// Load and print the settings without contacting any service.
    CheckSettings(CheckArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::CheckSettings(args) => args.run(),
    }
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
