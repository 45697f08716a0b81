//! RAG Evaluator - A batch evaluation harness for retrieval-augmented QA.
//!
//! The harness drives an external RAG service over a hand-authored
//! ground-truth question set, assembles the responses into a column-aligned
//! dataset, scores it with an LLM judge, and reports per-metric
//! distribution statistics.
//!
//! # Overview
//!
//! A run is a single-pass, single-writer batch pipeline:
//! 1. Probe the RAG service once (readiness check)
//! 2. Load the ground-truth dataset
//! 3. Collect a response per question, skipping failures
//! 4. Re-align ground truth with the questions that succeeded
//! 5. Assemble the four-column evaluation dataset
//! 6. Score it and persist a timestamped result file
//!
//! # Quick Start
//!
//! ```no_run
//! use rag_evaluator::{
//!     collector::ResponseCollector,
//!     config::Config,
//!     ground_truth::GroundTruthStore,
//!     harness::{EvaluationHarness, RunConfig},
//!     rag::HttpRagService,
//!     reporter::ResultsReporter,
//!     scoring::{JudgeClient, LlmJudge, Metric},
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     // Wire up the external collaborators
//!     let service = HttpRagService::new(&config.rag.api_base, &config.rag.api_key);
//!     let judge = LlmJudge::new(JudgeClient::new(config.judge.clone()));
//!
//!     let harness = EvaluationHarness::new(
//!         GroundTruthStore::new(&config.eval.ground_truth_path),
//!         ResponseCollector::new(Some(Arc::new(service))),
//!         ResultsReporter::new(Arc::new(judge), &config.eval.results_dir),
//!     );
//!
//!     // Evaluate one metric end to end
//!     let result = harness.run(Metric::Faithfulness, &RunConfig::default()).await?;
//!     println!("overall: {:?}", result.overall_score);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **GroundTruthStore**: loads the read-only question/answer dataset
//! - **ResponseCollector**: best-effort per-question RAG collection
//! - **EvaluationDataset**: the four-column table handed to the scorer
//! - **LlmJudge**: LLM-as-judge scoring backend
//! - **ResultsReporter**: aggregation, persistence, printed summary
//! - **EvaluationHarness**: ties the pipeline together per metric

pub mod collector;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ground_truth;
pub mod harness;
pub mod rag;
pub mod readiness;
pub mod reporter;
pub mod scoring;

// Re-export commonly used types
pub use collector::{CollectedResponses, ResponseCollector, SkipReason};
pub use config::Config;
pub use dataset::EvaluationDataset;
pub use error::{EvalError, Result};
pub use ground_truth::{GroundTruthRecord, GroundTruthStore};
pub use harness::{EvaluationHarness, RunConfig};
pub use rag::{HttpRagService, RagService};
pub use reporter::{EvaluationResult, ResultsReporter};
pub use scoring::{LlmJudge, Metric};
