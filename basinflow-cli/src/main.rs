mod tracing;

use crate::tracing::setup_tracing;
use ::tracing::info;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(long, default_value_t = false)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a model and write the result table to CSV.
    Run {
        /// Path to a model YAML document.
        model: PathBuf,
        /// Where to write the result table. Defaults to stdout.
        #[arg(short, long)]
        output_path: Option<PathBuf>,
    },
    /// Parse and build a model without running it.
    Validate {
        /// Path to a model YAML document.
        model: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.debug).ok();

    match &cli.command {
        Commands::Run { model, output_path } => run(model, output_path.as_deref()),
        Commands::Validate { model } => validate(model),
    }
}

fn load_model(path: &Path) -> Result<basinflow_schema::BuiltModel> {
    let data = std::fs::read_to_string(path).with_context(|| format!("reading model file {}", path.display()))?;
    let yaml_dir = path.parent().unwrap_or_else(|| Path::new("."));
    basinflow_schema::load(&data, yaml_dir).with_context(|| format!("building model from {}", path.display()))
}

fn run(path: &Path, output_path: Option<&Path>) -> Result<()> {
    let built = load_model(path)?;
    info!(model = %path.display(), "model built, starting run");

    let mut engine = basinflow_core::Engine::new(built.network, built.climate, built.timestepper);
    let result = engine.run().with_context(|| format!("running model {}", path.display()))?;

    match output_path {
        Some(output_path) => {
            let file = std::fs::File::create(output_path)
                .with_context(|| format!("creating output file {}", output_path.display()))?;
            result.to_csv(file)?;
            info!(rows = result.len(), output = %output_path.display(), "wrote results");
        }
        None => {
            result.to_csv(std::io::stdout())?;
        }
    }

    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let built = load_model(path)?;
    println!(
        "model `{}` is valid: {} components, {} timesteps",
        path.display(),
        built.network.order().len(),
        built.timestepper.len(),
    );
    Ok(())
}
