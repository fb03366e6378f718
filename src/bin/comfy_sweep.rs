use clap::Parser;
use comfy_sweep::compiler::core::Planner;
use comfy_sweep::compiler::loader::{load_sweep_config, load_workflow};
use comfy_sweep::runtime::config::{RunConfig, DEFAULT_API_URL, DEFAULT_OUTPUT_DIR};
use comfy_sweep::runtime::engine::Engine;
use std::path::PathBuf;
use anyhow::Result;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Queue every combination of a parameter sweep", long_about = None)]
struct Cli {
    /// Path to the workflow graph (API-format JSON)
    workflow: PathBuf,

    /// Path to the sweep config (JSON, or YAML by extension)
    config: PathBuf,

    /// Endpoint that accepts queued prompts
    #[arg(long, default_value = DEFAULT_API_URL)]
    url: String,

    /// Directory checked for already rendered outputs
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Plan and log every combination without submitting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // 1. Load inputs
    let workflow = load_workflow(&cli.workflow)?;
    let config = load_sweep_config(&cli.config)?;
    info!(
        "Loaded workflow with {} node(s) and sweep with {} axis/axes",
        workflow.nodes.len(),
        config.len()
    );

    // 2. Plan
    let plan = Planner::new(&workflow, &config).plan()?;

    // 3. Submit
    let run_config = RunConfig {
        api_url: cli.url,
        output_dir: cli.output_dir,
        dry_run: cli.dry_run,
    };
    let engine = Engine::from_config(&run_config);
    engine.run(&workflow, &config, &plan).await;

    Ok(())
}
