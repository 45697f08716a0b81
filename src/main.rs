//! RAG Evaluator CLI
//!
//! Evaluates a RAG question-answering pipeline against a ground-truth
//! dataset, one metric at a time or all four in a single pass.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rag_evaluator::{
    collector::ResponseCollector,
    config::Config,
    ground_truth::GroundTruthStore,
    harness::{EvaluationHarness, RunConfig},
    rag::{HttpRagService, RagService},
    readiness::check_service_ready,
    reporter::ResultsReporter,
    scoring::{JudgeClient, LlmJudge, Metric},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// RAG Evaluator - batch evaluation for retrieval-augmented QA
#[derive(Parser)]
#[command(name = "rag-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the RAG service once and report whether it is ready
    Check,

    /// Run an evaluation over the ground-truth dataset
    Run {
        /// Metric to evaluate
        #[arg(value_enum)]
        metric: MetricArg,

        /// Path to the ground-truth dataset file
        #[arg(short, long)]
        ground_truth: Option<PathBuf>,

        /// Directory where result files are written
        #[arg(short, long)]
        results_dir: Option<PathBuf>,

        /// Number of passages to retrieve per question
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Evaluate only the first N questions (for quick testing)
        #[arg(short, long)]
        max_questions: Option<usize>,
    },
}

/// Metric selection on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    ContextPrecision,
    ContextRecall,
    Faithfulness,
    AnswerCorrectness,
    /// Every metric over a single collection pass
    All,
}

impl MetricArg {
    fn as_metric(self) -> Option<Metric> {
        match self {
            MetricArg::ContextPrecision => Some(Metric::ContextPrecision),
            MetricArg::ContextRecall => Some(Metric::ContextRecall),
            MetricArg::Faithfulness => Some(Metric::Faithfulness),
            MetricArg::AnswerCorrectness => Some(Metric::AnswerCorrectness),
            MetricArg::All => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check => cmd_check().await,
        Commands::Run {
            metric,
            ground_truth,
            results_dir,
            top_k,
            max_questions,
        } => cmd_run(metric, ground_truth, results_dir, top_k, max_questions).await,
    }
}

/// Build the RAG service handle, if an endpoint is configured.
///
/// A missing endpoint is not an error here: the collector treats a `None`
/// handle as "service unavailable" and the readiness check reports it.
fn rag_service(config: &Config) -> Option<Arc<dyn RagService>> {
    if config.rag.api_base.is_empty() {
        return None;
    }
    Some(Arc::new(HttpRagService::new(
        &config.rag.api_base,
        &config.rag.api_key,
    )))
}

async fn cmd_check() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let collector = ResponseCollector::new(rag_service(&config));

    if !check_service_ready(&collector).await {
        std::process::exit(1);
    }

    Ok(())
}

async fn cmd_run(
    metric: MetricArg,
    ground_truth: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    top_k: Option<usize>,
    max_questions: Option<usize>,
) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(path) = ground_truth {
        config.eval.ground_truth_path = path;
    }
    if let Some(dir) = results_dir {
        config.eval.results_dir = dir;
    }
    config.validate().context("Invalid configuration")?;

    println!("Ground truth: {}", config.eval.ground_truth_path.display());
    println!("Results dir:  {}", config.eval.results_dir.display());
    println!("Judge model:  {}", config.judge.model);
    println!(
        "Max questions: {}",
        max_questions.map_or("all".to_string(), |n| n.to_string())
    );
    println!();

    let judge = LlmJudge::new(JudgeClient::new(config.judge.clone()));

    let harness = EvaluationHarness::new(
        GroundTruthStore::new(&config.eval.ground_truth_path),
        ResponseCollector::new(rag_service(&config)),
        ResultsReporter::new(Arc::new(judge), &config.eval.results_dir),
    );

    let run_config = RunConfig {
        top_k,
        max_questions,
    };

    match metric.as_metric() {
        Some(metric) => {
            harness
                .run(metric, &run_config)
                .await
                .with_context(|| format!("{} evaluation failed", metric))?;
            println!("\n{} evaluation completed", metric);
        }
        None => {
            let results = harness
                .run_all(&run_config)
                .await
                .context("Evaluation failed")?;
            println!("\nCompleted {} metric evaluations", results.len());
        }
    }

    Ok(())
}
