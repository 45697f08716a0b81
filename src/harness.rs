//! End-to-end evaluation runs.
//!
//! One run is a straight pipeline with no feedback loop: readiness probe,
//! ground-truth load, response collection, ground-truth re-alignment,
//! dataset assembly, scoring, summary, persistence. A failure before
//! assembly halts with no partial output; after assembly a summary is
//! always printed and a result file always written.

use crate::collector::{ResponseCollector, DEFAULT_TOP_K};
use crate::dataset::EvaluationDataset;
use crate::error::{EvalError, Result};
use crate::ground_truth::GroundTruthStore;
use crate::readiness::check_service_ready;
use crate::reporter::{EvaluationResult, ResultsReporter};
use crate::scoring::Metric;

/// Knobs for one evaluation run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Passage budget per question. `None` uses the metric's default
    /// (or [`DEFAULT_TOP_K`] when several metrics share one collection).
    pub top_k: Option<usize>,
    /// Evaluate only the first N questions.
    pub max_questions: Option<usize>,
}

/// Drives the full pipeline for one or more metrics.
pub struct EvaluationHarness {
    store: GroundTruthStore,
    collector: ResponseCollector,
    reporter: ResultsReporter,
}

impl EvaluationHarness {
    /// Assemble a harness from its three collaborators.
    pub fn new(
        store: GroundTruthStore,
        collector: ResponseCollector,
        reporter: ResultsReporter,
    ) -> Self {
        Self {
            store,
            collector,
            reporter,
        }
    }

    /// Run one metric end to end.
    pub async fn run(&self, metric: Metric, config: &RunConfig) -> Result<EvaluationResult> {
        let top_k = config.top_k.unwrap_or_else(|| metric.default_top_k());

        println!("{} evaluation", metric);
        println!("{}", "=".repeat(60));
        println!("Measuring {}", metric.description());
        println!("{}", "=".repeat(60));

        let (dataset, attempted) = self.collect_dataset(top_k, config.max_questions).await?;

        let extra = Self::run_metadata(top_k, config.max_questions, attempted, dataset.len());
        let result = self.reporter.score(&dataset, metric, extra).await?;

        self.reporter.summarize(&result);
        self.reporter.persist(&result)?;

        Ok(result)
    }

    /// Run every metric against a single collection pass.
    ///
    /// The RAG output for a question does not depend on the metric being
    /// scored, so the RAG service is driven once.
    pub async fn run_all(&self, config: &RunConfig) -> Result<Vec<EvaluationResult>> {
        let top_k = config.top_k.unwrap_or(DEFAULT_TOP_K);

        println!("Full evaluation: {} metrics", Metric::ALL.len());
        println!("{}", "=".repeat(60));

        let (dataset, attempted) = self.collect_dataset(top_k, config.max_questions).await?;

        let extra = Self::run_metadata(top_k, config.max_questions, attempted, dataset.len());
        let results = self
            .reporter
            .score_all(&dataset, &Metric::ALL, extra)
            .await?;

        for result in &results {
            self.reporter.summarize(result);
            self.reporter.persist(result)?;
        }

        Ok(results)
    }

    /// Shared front half of every run: probe, load, collect, re-align,
    /// assemble. Returns the dataset plus the number of questions attempted.
    async fn collect_dataset(
        &self,
        top_k: usize,
        max_questions: Option<usize>,
    ) -> Result<(EvaluationDataset, usize)> {
        if !check_service_ready(&self.collector).await {
            return Err(EvalError::ServiceNotReady);
        }

        let data = self.store.load()?;
        let (questions, ground_truth_answers) = data.extract();

        let attempted = max_questions
            .map(|max| questions.len().min(max))
            .unwrap_or(questions.len());

        let collected = self
            .collector
            .collect(&questions, top_k, max_questions)
            .await;

        if collected.is_empty() {
            return Err(EvalError::NoResponses { attempted });
        }

        // Re-align the inputs with the surviving questions. All three
        // output sequences were filtered in lockstep by the same indices.
        let successful_questions: Vec<String> = collected
            .success_indices
            .iter()
            .map(|&i| questions[i].clone())
            .collect();
        let successful_ground_truth: Vec<String> = collected
            .success_indices
            .iter()
            .map(|&i| ground_truth_answers[i].clone())
            .collect();

        println!(
            "Successfully processed {} out of {} questions",
            successful_questions.len(),
            attempted
        );

        let dataset = EvaluationDataset::assemble(
            successful_questions,
            collected.answers,
            collected.contexts,
            successful_ground_truth,
        )?;

        Ok((dataset, attempted))
    }

    fn run_metadata(
        top_k: usize,
        max_questions: Option<usize>,
        attempted: usize,
        successful: usize,
    ) -> serde_json::Map<String, serde_json::Value> {
        let mut extra = serde_json::Map::new();
        extra.insert(
            "evaluation_config".to_string(),
            serde_json::json!({
                "top_k": top_k,
                "max_questions": max_questions,
                "total_questions_attempted": attempted,
                "successful_questions": successful,
            }),
        );
        extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::{RagResponse, RagService, RetrievedPassage};
    use crate::scoring::{RowScores, ScoreTable, ScoringBackend};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Answers every question except those listed as broken.
    struct PartialService {
        broken: Vec<String>,
    }

    #[async_trait]
    impl RagService for PartialService {
        async fn answer(&self, question: &str, top_k: usize) -> Result<RagResponse> {
            if self.broken.iter().any(|q| q == question) {
                return Ok(RagResponse {
                    answer: "unsupported".to_string(),
                    passages: vec![],
                });
            }
            Ok(RagResponse {
                answer: format!("answer: {}", question),
                passages: (0..top_k)
                    .map(|i| RetrievedPassage::PlainText(format!("chunk {}", i)))
                    .collect(),
            })
        }
    }

    /// Scores every row 0.9 on every requested metric.
    struct ConstantScorer;

    #[async_trait]
    impl ScoringBackend for ConstantScorer {
        async fn evaluate(
            &self,
            dataset: &EvaluationDataset,
            metrics: &[Metric],
        ) -> Result<ScoreTable> {
            let rows = dataset
                .rows()
                .map(|row| RowScores {
                    question: row.question.to_string(),
                    scores: metrics
                        .iter()
                        .map(|m| (m.name().to_string(), 0.9))
                        .collect::<BTreeMap<_, _>>(),
                })
                .collect();
            Ok(ScoreTable::new(rows))
        }
    }

    fn write_ground_truth(dir: &TempDir, questions: &[&str]) -> std::path::PathBuf {
        let records: Vec<serde_json::Value> = questions
            .iter()
            .map(|q| {
                serde_json::json!({
                    "question": q,
                    "answer": format!("expected: {}", q),
                    "context_hint": "somewhere",
                    "difficulty": "medium",
                })
            })
            .collect();
        let data = serde_json::json!({
            "metadata": {
                "description": "test set",
                "categories": ["test"],
                "total_questions": questions.len(),
            },
            "ground_truth": records,
        });
        let path = dir.path().join("ground_truth_dataset.json");
        std::fs::write(&path, serde_json::to_string_pretty(&data).unwrap()).unwrap();
        path
    }

    fn harness(
        ground_truth: std::path::PathBuf,
        results_dir: std::path::PathBuf,
        service: Option<Arc<dyn RagService>>,
    ) -> EvaluationHarness {
        EvaluationHarness::new(
            GroundTruthStore::new(ground_truth),
            ResponseCollector::new(service),
            ResultsReporter::new(Arc::new(ConstantScorer), results_dir),
        )
    }

    #[tokio::test]
    async fn test_run_skips_failed_question_and_persists() {
        let dir = TempDir::new().unwrap();
        let gt_path = write_ground_truth(&dir, &["q0", "q1", "q2"]);
        let results_dir = dir.path().join("results");

        let service = PartialService {
            broken: vec!["q1".to_string()],
        };
        let harness = harness(gt_path, results_dir.clone(), Some(Arc::new(service)));

        let result = harness
            .run(Metric::Faithfulness, &RunConfig::default())
            .await
            .unwrap();

        // Question q1 retrieved nothing: two rows survive
        assert_eq!(result.per_row_scores.as_ref().unwrap().len(), 2);
        assert!(result.overall_score.is_some());

        let path = results_dir.join("faithfulness_results.json");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["evaluation_config"]["successful_questions"], 2);
        assert_eq!(value["evaluation_config"]["total_questions_attempted"], 3);

        // Surviving rows keep the original question order
        let detailed = value["detailed_results"].as_array().unwrap();
        assert_eq!(detailed[0]["question"], "q0");
        assert_eq!(detailed[1]["question"], "q2");
    }

    #[tokio::test]
    async fn test_run_without_ground_truth_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let results_dir = dir.path().join("results");

        let service = PartialService { broken: vec![] };
        let harness = harness(
            dir.path().join("missing.json"),
            results_dir.clone(),
            Some(Arc::new(service)),
        );

        let err = harness
            .run(Metric::ContextRecall, &RunConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EvalError::GroundTruthNotFound(_)));
        assert!(!results_dir.exists());
    }

    #[tokio::test]
    async fn test_run_fails_fast_when_service_missing() {
        let dir = TempDir::new().unwrap();
        let gt_path = write_ground_truth(&dir, &["q0"]);

        let harness = harness(gt_path, dir.path().join("results"), None);

        let err = harness
            .run(Metric::ContextPrecision, &RunConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EvalError::ServiceNotReady));
    }

    #[tokio::test]
    async fn test_run_all_writes_one_file_per_metric() {
        let dir = TempDir::new().unwrap();
        let gt_path = write_ground_truth(&dir, &["q0", "q1"]);
        let results_dir = dir.path().join("results");

        let service = PartialService { broken: vec![] };
        let harness = harness(gt_path, results_dir.clone(), Some(Arc::new(service)));

        let results = harness.run_all(&RunConfig::default()).await.unwrap();
        assert_eq!(results.len(), Metric::ALL.len());

        for metric in Metric::ALL {
            let path = results_dir.join(format!("{}_results.json", metric.name()));
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    #[tokio::test]
    async fn test_run_respects_max_questions() {
        let dir = TempDir::new().unwrap();
        let gt_path = write_ground_truth(&dir, &["q0", "q1", "q2", "q3"]);
        let results_dir = dir.path().join("results");

        let service = PartialService { broken: vec![] };
        let harness = harness(gt_path, results_dir, Some(Arc::new(service)));

        let config = RunConfig {
            top_k: Some(1),
            max_questions: Some(2),
        };
        let result = harness.run(Metric::AnswerCorrectness, &config).await.unwrap();
        assert_eq!(result.per_row_scores.as_ref().unwrap().len(), 2);
    }
}
