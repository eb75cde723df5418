//! Command-line driver for the analysis pipeline.
//!
//! Thin presentation layer: parses the input selection, watches workflow
//! state transitions, and renders the final result as JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vidsight_media::SourceInput;
use vidsight_models::AnalysisVariant;
use vidsight_workflow::{AnalysisWorkflow, WorkflowConfig};

#[derive(Debug, Parser)]
#[command(name = "vidsight", about = "Analyze a video or audio file with structured AI generation")]
struct Args {
    /// Local media file to analyze
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Remote media URL to analyze
    #[arg(long)]
    url: Option<String>,

    /// Which result sections to request
    #[arg(long, value_enum, default_value_t = VariantArg::Standard)]
    variant: VariantArg,

    /// Write the result JSON to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    ChaptersOnly,
    Standard,
    BrandExposure,
    Full,
}

impl From<VariantArg> for AnalysisVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::ChaptersOnly => Self::ChaptersOnly,
            VariantArg::Standard => Self::Standard,
            VariantArg::BrandExposure => Self::BrandExposure,
            VariantArg::Full => Self::Full,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vidsight=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let args = Args::parse();

    let input = match (args.file, args.url) {
        (Some(path), None) => SourceInput::File { path },
        (None, Some(location)) => SourceInput::Url { location },
        _ => bail!("provide exactly one of --file or --url"),
    };

    let config = WorkflowConfig::from_env();
    let workflow = AnalysisWorkflow::new(config);

    // Print phase transitions and progress while the run executes.
    let mut updates = workflow.subscribe();
    let progress = tokio::spawn(async move {
        let mut last = String::new();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.progress_message != last && !state.progress_message.is_empty() {
                info!(
                    phase = state.phase.as_str(),
                    elapsed = state.elapsed_secs,
                    "{}",
                    state.progress_message
                );
                last = state.progress_message;
            }
            // Validation failures stay in Idle but still publish an error.
            if state.phase.is_terminal() || state.error.is_some() {
                break;
            }
        }
    });

    let outcome = workflow.run(input, args.variant.into()).await;
    let _ = progress.await;

    match outcome {
        Ok(result) => {
            let rendered = serde_json::to_string_pretty(&result)?;
            match args.output {
                Some(path) => {
                    tokio::fs::write(&path, rendered)
                        .await
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("Result written to {}", path.display());
                }
                None => println!("{}", rendered),
            }
            if let Some(path) = workflow.playable_path().await {
                info!("Playable media at {}", path.display());
            }
            Ok(())
        }
        Err(err) => {
            let state = workflow.state();
            bail!(state.error.unwrap_or_else(|| err.to_string()))
        }
    }
}
