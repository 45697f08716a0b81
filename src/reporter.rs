//! Scoring delegation, result persistence, and the printed summary.

use crate::dataset::EvaluationDataset;
use crate::error::{EvalError, Result};
use crate::scoring::{Metric, ScoreTable, ScoringBackend};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Constant tag written into every result file.
pub const EVALUATION_TYPE: &str = "rag_evaluation";

/// The outcome of scoring one metric over one dataset.
///
/// Created once per run and never mutated. `overall_score` is absent when
/// the scorer's output lacked the metric column: schema drift degrades to
/// "no score available" rather than aborting the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Metric this result reports.
    pub metric_name: String,
    /// Arithmetic mean of the per-row scores, if the column was present.
    pub overall_score: Option<f64>,
    /// ISO-8601 timestamp of the evaluation.
    pub evaluation_timestamp: String,
    /// Row-level breakdown from the scorer.
    pub detailed_results: Option<Vec<serde_json::Value>>,
    /// Constant tag identifying the producer.
    pub evaluation_type: String,
    /// Per-row scores for the reported metric. Not persisted separately;
    /// the file carries `detailed_results` instead.
    #[serde(skip)]
    pub per_row_scores: Option<Vec<f64>>,
    /// Caller-supplied additional metadata, merged into the file.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Per-bucket question counts over a score sequence.
///
/// The thresholds are a fixed reporting policy: excellent >= 0.8,
/// good [0.6, 0.8), fair [0.4, 0.6), poor < 0.4. Every score lands in
/// exactly one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketCounts {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

impl BucketCounts {
    /// Count each score into its bucket.
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut counts = BucketCounts::default();
        for &score in scores {
            if score >= 0.8 {
                counts.excellent += 1;
            } else if score >= 0.6 {
                counts.good += 1;
            } else if score >= 0.4 {
                counts.fair += 1;
            } else {
                counts.poor += 1;
            }
        }
        counts
    }

    /// Total scored rows across all buckets.
    pub fn total(&self) -> usize {
        self.excellent + self.good + self.fair + self.poor
    }
}

fn mean(scores: &[f64]) -> f64 {
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Sample standard deviation (n - 1 denominator). 0.0 for fewer than two
/// scores.
fn std_dev(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let m = mean(scores);
    let variance =
        scores.iter().map(|s| (s - m) * (s - m)).sum::<f64>() / (scores.len() - 1) as f64;
    variance.sqrt()
}

/// Delegates a dataset to the scoring backend, then owns the resulting
/// record: aggregation, persistence, and the printed summary.
pub struct ResultsReporter {
    scorer: Arc<dyn ScoringBackend>,
    results_dir: PathBuf,
}

impl ResultsReporter {
    /// Create a reporter writing under the given results directory.
    pub fn new(scorer: Arc<dyn ScoringBackend>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            scorer,
            results_dir: results_dir.into(),
        }
    }

    /// Score one metric over the dataset.
    pub async fn score(
        &self,
        dataset: &EvaluationDataset,
        metric: Metric,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> Result<EvaluationResult> {
        let table = self.scorer.evaluate(dataset, &[metric]).await?;
        Ok(Self::result_from_table(&table, metric, extra))
    }

    /// Score several metrics over the dataset in a single backend pass,
    /// producing one result record per metric.
    pub async fn score_all(
        &self,
        dataset: &EvaluationDataset,
        metrics: &[Metric],
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<EvaluationResult>> {
        let table = self.scorer.evaluate(dataset, metrics).await?;
        Ok(metrics
            .iter()
            .map(|metric| Self::result_from_table(&table, *metric, extra.clone()))
            .collect())
    }

    /// Build a result record for one metric from an existing score table.
    ///
    /// Used directly when several metrics were scored in a single backend
    /// pass.
    pub fn result_from_table(
        table: &ScoreTable,
        metric: Metric,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> EvaluationResult {
        let per_row_scores = table.column(metric.name());
        if per_row_scores.is_none() {
            warn!(
                metric = %metric,
                "metric column missing from scorer output; recording no overall score"
            );
        }

        let overall_score = per_row_scores.as_deref().map(mean);

        EvaluationResult {
            metric_name: metric.name().to_string(),
            overall_score,
            evaluation_timestamp: chrono::Utc::now().to_rfc3339(),
            detailed_results: Some(table.to_rows()),
            evaluation_type: EVALUATION_TYPE.to_string(),
            per_row_scores,
            extra,
        }
    }

    /// Write the result to `<results_dir>/<metric_name>_results.json`,
    /// creating the directory if missing.
    pub fn persist(&self, result: &EvaluationResult) -> Result<PathBuf> {
        if !self.results_dir.exists() {
            fs::create_dir_all(&self.results_dir)
                .map_err(|e| EvalError::io(&self.results_dir, e))?;
        }

        let path = self
            .results_dir
            .join(format!("{}_results.json", result.metric_name));

        let json = serde_json::to_string_pretty(result)
            .map_err(|e| EvalError::Serialization(e.to_string()))?;
        fs::write(&path, json).map_err(|e| EvalError::io(&path, e))?;

        println!("Results saved to: {}", path.display());

        Ok(path)
    }

    /// Directory result files are written to.
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Print distribution statistics and the pass-rate breakdown.
    pub fn summarize(&self, result: &EvaluationResult) {
        let title = result.metric_name.replace('_', " ");

        println!("\n{}", "=".repeat(60));
        println!("{} EVALUATION RESULTS", result.metric_name.to_uppercase());
        println!("{}", "=".repeat(60));

        let Some(scores) = result.per_row_scores.as_deref().filter(|s| !s.is_empty()) else {
            println!("\nNo {} scores available in scorer output", title);
            println!("\n{}", "=".repeat(60));
            return;
        };

        if let Some(overall) = result.overall_score {
            println!("\nOverall {} score: {:.4}", title, overall);
        }

        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        println!("\nScore Distribution:");
        println!("  - Min: {:.4}", min);
        println!("  - Max: {:.4}", max);
        println!("  - Std: {:.4}", std_dev(scores));

        let buckets = BucketCounts::from_scores(scores);

        println!("\nPerformance Breakdown:");
        println!("  - Excellent (>=0.8): {} questions", buckets.excellent);
        println!("  - Good (0.6-0.8): {} questions", buckets.good);
        println!("  - Fair (0.4-0.6): {} questions", buckets.fair);
        println!("  - Poor (<0.4): {} questions", buckets.poor);

        println!("\n{}", "=".repeat(60));
    }
}
