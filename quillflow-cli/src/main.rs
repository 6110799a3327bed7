//! Console entry point: a one-shot or interactive research assistant.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use quillflow::config::PipelineConfig;
use quillflow::executor::RetryPolicy;
use quillflow::orchestrator::Orchestrator;

/// Answer research questions through a retrying three-stage pipeline
#[derive(Parser)]
#[command(name = "quillflow")]
#[command(about = "Answer research questions through a retrying three-stage pipeline", long_about = None)]
struct Cli {
    /// Run a single query and exit instead of starting the interactive loop
    #[arg(short, long)]
    query: Option<String>,

    /// JSON file used to persist conversations and extracted facts
    #[arg(long, default_value = "memory_store.json")]
    memory_file: PathBuf,

    /// Number of sources requested from the research stage
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Attempts allowed per stage before its fallback is used
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Delay between stage attempts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    retry_delay_ms: u64,

    /// Minimum quality score a response must reach to be accepted
    #[arg(long, default_value_t = 0.6)]
    quality_threshold: f64,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    debug!(
        top_k = cli.top_k,
        max_attempts = cli.max_attempts,
        retry_delay_ms = cli.retry_delay_ms,
        quality_threshold = cli.quality_threshold,
        memory_file = %cli.memory_file.display(),
        "pipeline configured"
    );

    let config = PipelineConfig::new()
        .with_retry(
            RetryPolicy::new()
                .with_max_attempts(cli.max_attempts)
                .with_base_delay(Duration::from_millis(cli.retry_delay_ms)),
        )
        .with_quality_threshold(cli.quality_threshold)
        .with_top_k(cli.top_k)
        .with_memory_path(cli.memory_file);

    let orchestrator = Orchestrator::with_config(config);
    info!("research assistant is ready");

    if let Some(query) = cli.query {
        let response = orchestrator.run(&query).await;
        println!("{response}");
        return Ok(());
    }

    run_interactive(&orchestrator).await
}

async fn run_interactive(orchestrator: &Orchestrator) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\nEnter your research question (or type 'quit' to exit): ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let query = line.trim();
        if query.eq_ignore_ascii_case("quit") || query.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        let response = orchestrator.run(query).await;
        println!("\n======== RESEARCH RESPONSE ========\n");
        println!("{response}");
        println!("\n===================================");
    }

    Ok(())
}
