//! ollama-chain CLI
//!
//! Runs several Ollama models one after another over a shared prompt history.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod progress;
mod prompt;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context;
use application::{ChainService, render_transcript};
use clap::{Parser, Subcommand};
use infrastructure::{
    AppConfig, EndpointWaiter, LogFormat, OllamaGenerationAdapter, init_logging,
};
use tracing::{debug, info};

use crate::{progress::StdoutProgress, prompt::load_prompt};

/// ollama-chain CLI
#[derive(Parser)]
#[command(name = "ollama-chain")]
#[command(author, version, about = "Run multiple Ollama models sequentially using a shared prompt history", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format (text or json)
    #[arg(long, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Configuration file (default: ollama-chain.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a chain of models
    ///
    /// Example: ollama-chain run --prompt "Design a REST API" --step "llama3#Draft it" --step qwen@gpu-box:11434
    Run {
        /// Initial prompt passed to the first model
        #[arg(long)]
        prompt: Option<String>,

        /// Read the initial prompt from a file
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// Pipeline stage as model[@endpoint][#directive], repeat for each model
        #[arg(long = "step", required = true)]
        steps: Vec<String>,

        /// Fallback endpoint for steps without an explicit host
        #[arg(long, env = "OLLAMA_BASE_URL")]
        base_url: Option<String>,

        /// HTTP timeout in seconds for each request
        #[arg(long)]
        timeout: Option<f64>,

        /// Directive for steps without one; an empty string disables it
        #[arg(long)]
        default_directive: Option<String>,

        /// Write the full conversation transcript as Markdown
        #[arg(long)]
        transcript: Option<PathBuf>,
    },

    /// Wait until HTTP endpoints respond with a 2xx or 3xx status
    Wait {
        /// URLs to poll
        #[arg(required = true)]
        urls: Vec<String>,

        /// Attempts per URL
        #[arg(long)]
        retries: Option<u32>,

        /// Seconds between attempts
        #[arg(long)]
        delay: Option<f64>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<f64>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(log_filter_from_verbosity(cli.verbose), cli.log_format) {
        eprintln!("Warning: {e}");
    }

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

async fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Configuration error")?;

    match cli.command {
        Commands::Run {
            prompt,
            prompt_file,
            steps,
            base_url,
            timeout,
            default_directive,
            transcript,
        } => {
            if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
                config.chain.default_endpoint = base_url;
            }
            if let Some(timeout) = timeout {
                config.chain.timeout_secs = timeout;
            }
            if let Some(directive) = default_directive {
                config.chain.default_directive = directive;
            }

            let prompt = load_prompt(prompt.as_deref(), prompt_file.as_deref())?;
            run_chain(&config, &prompt, &steps, transcript).await
        },

        Commands::Wait {
            urls,
            retries,
            delay,
            timeout,
        } => {
            if let Some(retries) = retries {
                config.wait.retries = retries;
            }
            if let Some(delay) = delay {
                config.wait.delay_secs = delay;
            }
            if let Some(timeout) = timeout {
                config.wait.timeout_secs = timeout;
            }

            wait_for_endpoints(&config, &urls).await
        },
    }
}

async fn run_chain(
    config: &AppConfig,
    prompt: &str,
    steps: &[String],
    transcript: Option<PathBuf>,
) -> anyhow::Result<()> {
    let adapter = OllamaGenerationAdapter::new(config.chain.inference())?;
    let service = ChainService::new(
        Arc::new(adapter),
        config.chain.default_endpoint.clone(),
        config.chain.directive_policy(),
    )
    .with_observer(Arc::new(StdoutProgress));

    let plan = service.plan(prompt, steps)?;
    info!(
        stages = plan.stages().len(),
        default_endpoint = service.default_endpoint(),
        "Starting chain"
    );

    let history = service.run(&plan).await?;

    if let Some(path) = transcript {
        let document = render_transcript(&history, &config.transcript);
        tokio::fs::write(&path, document)
            .await
            .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
        let shown = std::path::absolute(&path).unwrap_or(path);
        debug!(path = %shown.display(), "Transcript written");
        println!("\nTranscript saved to {}", shown.display());
    }

    Ok(())
}

async fn wait_for_endpoints(config: &AppConfig, urls: &[String]) -> anyhow::Result<()> {
    let waiter = EndpointWaiter::new(config.wait.clone())?;
    let reports = waiter.wait_for_all(urls).await;

    let mut failed = 0_usize;
    for report in &reports {
        if let Some(outcome) = report.last_outcome.as_ref().filter(|_| !report.healthy) {
            println!("{} {outcome}", report.url);
        }
        println!("{report}");
        if !report.healthy {
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} endpoint(s) failed health check");
    }
    Ok(())
}
