use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use reefdose_core::{engine::EngineBuilder, gate::Readiness};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod report;

/// Daily dosing recommendations for reef aquarium water chemistry.
#[derive(Debug, Parser)]
#[command(name = "reefdose", version, about)]
struct Cli {
    /// Log engine internals (trend fits, corrections) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the facts still missing before doses can be computed.
    Check(InputArgs),
    /// Compute one-time corrections and daily doses.
    Recommend {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write the recommendations to this CSV file.
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// YAML snapshot with tank, targets, products, doses and readings.
    #[arg(long)]
    snapshot: PathBuf,

    /// Extra readings as CSV (measured_at,parameter,value).
    #[arg(long)]
    readings: Option<PathBuf>,

    /// Engine settings as YAML. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference time for the reading window (RFC 3339). Defaults to now.
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check(input) => {
            let (snapshot, engine_config) = config::load_inputs(
                &input.snapshot,
                input.readings.as_deref(),
                input.config.as_deref(),
            )?;
            let engine = EngineBuilder::new().with_config(engine_config).build()?;
            match engine.check(&snapshot) {
                Readiness::Ready => println!("All required inputs are present."),
                Readiness::Blocked(questions) => report::print_questions(&questions),
            }
        }
        Commands::Recommend {
            input,
            format,
            export,
        } => {
            let (snapshot, engine_config) = config::load_inputs(
                &input.snapshot,
                input.readings.as_deref(),
                input.config.as_deref(),
            )?;
            let engine = EngineBuilder::new().with_config(engine_config).build()?;
            // Captured once so every parameter sees the same window.
            let now = input.now.unwrap_or_else(Utc::now);
            tracing::info!(%now, tank = %snapshot.tank.tank_id, "computing recommendations");

            let assessment = engine.assess(&snapshot, now)?;
            let increment = engine.config().rounding_increment_ml;

            match format {
                OutputFormat::Text => report::print_text(&assessment, increment),
                OutputFormat::Json => println!("{}", report::to_json(&assessment)?),
            }

            if let Some(path) = export {
                report::export_csv(&path, assessment.recommendations(), increment)?;
                tracing::info!(path = %path.display(), "recommendations exported");
            }
        }
    }

    Ok(())
}
