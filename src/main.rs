use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use job_search_pipeline::{AdapterRegistry, Config, FileWriter, SearchOrchestrator};

/// Automated job board search and organization
#[derive(Parser, Debug)]
#[command(name = "job-search-pipeline", version, about)]
struct Cli {
    /// Specific board to search (searches all enabled boards if not specified)
    #[arg(long)]
    board: Option<String>,

    /// Configuration directory path
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Base directory for job files
    #[arg(long, default_value = "jobs/pipeline")]
    output_dir: PathBuf,

    /// Enable debug-level logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "debug"
    } else {
        "job_search_pipeline=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!("Loading configuration from {}", cli.config_dir.display());
    let config = Config::load(&cli.config_dir)
        .with_context(|| format!("failed to load configuration from {}", cli.config_dir.display()))?;

    let registry = AdapterRegistry::builtin();
    let orchestrator = SearchOrchestrator::new(&config, &registry);

    let enabled_boards = orchestrator.get_enabled_boards();
    if enabled_boards.is_empty() {
        anyhow::bail!(
            "No job boards enabled. Enable at least one board in {}",
            cli.config_dir.join("job-boards.yaml").display()
        );
    }
    println!("Enabled boards: {}", enabled_boards.join(", "));

    let jobs = match &cli.board {
        Some(board) => {
            println!("Searching {board}...");
            orchestrator.search_specific_board(board).await?
        }
        None => {
            println!("Searching all enabled boards...");
            orchestrator.run_search().await?
        }
    };

    if jobs.is_empty() {
        tracing::warn!("No jobs found");
        println!("No jobs found. Try adjusting search criteria in search-criteria.yaml");
        return Ok(());
    }

    tracing::info!("Writing {} jobs to files...", jobs.len());
    let writer = FileWriter::new(&cli.output_dir)?;
    let output_files = writer.write_jobs(&jobs, None)?;

    println!();
    println!("Search complete");
    println!("  Total jobs found: {}", jobs.len());
    println!("  Files created:    {}", output_files.len());
    println!("  Output directory: {}", writer.base_path().display());

    for file_path in output_files.iter().take(10) {
        println!("  - {}", file_path.display());
    }
    if output_files.len() > 10 {
        println!("  ... and {} more files", output_files.len() - 10);
    }

    Ok(())
}
