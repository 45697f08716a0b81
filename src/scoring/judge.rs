//! LLM-as-judge scoring backend.

use crate::dataset::EvaluationDataset;
use crate::error::{EvalError, Result};
use crate::scoring::backend::{RowScores, ScoreTable, ScoringBackend};
use crate::scoring::client::JudgeClient;
use crate::scoring::metrics::Metric;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::warn;

/// A parsed judge verdict for one row and one metric.
#[derive(Debug, Clone)]
pub struct JudgeVerdict {
    /// Score in [0, 1].
    pub score: f64,
    /// Explanation from the judge.
    pub explanation: String,
}

/// Scores dataset rows by prompting an LLM once per row per metric.
///
/// Calls are strictly sequential. A failed call costs that row its column,
/// never the whole evaluation.
pub struct LlmJudge {
    client: JudgeClient,
}

impl LlmJudge {
    /// Create a new judge over the given client.
    pub fn new(client: JudgeClient) -> Self {
        Self { client }
    }

    /// Judge one prompt and parse the verdict.
    async fn judge(&self, prompt: &str) -> Result<JudgeVerdict> {
        let response = self.client.complete(None, prompt).await?;
        Self::parse_verdict(&response)
    }

    /// Parse a judge response JSON.
    fn parse_verdict(response: &str) -> Result<JudgeVerdict> {
        let json_str = Self::extract_json(response);

        #[derive(Deserialize)]
        struct RawVerdict {
            score: f64,
            #[serde(default)]
            explanation: String,
        }

        let raw: RawVerdict = serde_json::from_str(&json_str).map_err(|e| {
            EvalError::ScorerParse(format!(
                "Failed to parse judge verdict: {}. Response: {}",
                e, response
            ))
        })?;

        Ok(JudgeVerdict {
            score: raw.score.clamp(0.0, 1.0),
            explanation: raw.explanation,
        })
    }

    /// Extract JSON from a response that may wrap it in code fences or prose.
    fn extract_json(response: &str) -> String {
        let response = response.trim();

        if response.starts_with("```json") {
            if let Some(end) = response.rfind("```") {
                let start = "```json".len();
                if end > start {
                    return response[start..end].trim().to_string();
                }
            }
        }

        if response.starts_with("```") {
            if let Some(end) = response.rfind("```") {
                let start = response.find('\n').map(|n| n + 1).unwrap_or(3);
                if end > start {
                    return response[start..end].trim().to_string();
                }
            }
        }

        if let Some(start) = response.find('{') {
            if let Some(end) = response.rfind('}') {
                if end > start {
                    return response[start..=end].to_string();
                }
            }
        }

        response.to_string()
    }
}

#[async_trait]
impl ScoringBackend for LlmJudge {
    async fn evaluate(
        &self,
        dataset: &EvaluationDataset,
        metrics: &[Metric],
    ) -> Result<ScoreTable> {
        let mut rows = Vec::with_capacity(dataset.len());

        for (i, row) in dataset.rows().enumerate() {
            let mut scores = BTreeMap::new();

            for metric in metrics {
                let prompt = metric.judge_prompt(&row);
                match self.judge(&prompt).await {
                    Ok(verdict) => {
                        scores.insert(metric.name().to_string(), verdict.score);
                    }
                    Err(e) => {
                        warn!(row = i, metric = %metric, error = %e, "judge call failed");
                    }
                }
            }

            rows.push(RowScores {
                question: row.question.to_string(),
                scores,
            });
        }

        Ok(ScoreTable::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verdict() {
        let response = r#"{"score": 0.85, "explanation": "Mostly supported"}"#;
        let verdict = LlmJudge::parse_verdict(response).unwrap();

        assert!((verdict.score - 0.85).abs() < 1e-9);
        assert_eq!(verdict.explanation, "Mostly supported");
    }

    #[test]
    fn test_parse_verdict_clamps_out_of_range() {
        let verdict = LlmJudge::parse_verdict(r#"{"score": 1.7}"#).unwrap();
        assert_eq!(verdict.score, 1.0);

        let verdict = LlmJudge::parse_verdict(r#"{"score": -0.2}"#).unwrap();
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn test_parse_verdict_strips_code_fence() {
        let response = "```json\n{\"score\": 0.5, \"explanation\": \"half\"}\n```";
        let verdict = LlmJudge::parse_verdict(response).unwrap();
        assert!((verdict.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_verdict_finds_embedded_json() {
        let response = "Here is my verdict: {\"score\": 0.25, \"explanation\": \"weak\"} Done.";
        let verdict = LlmJudge::parse_verdict(response).unwrap();
        assert!((verdict.score - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_parse_verdict_rejects_garbage() {
        assert!(LlmJudge::parse_verdict("no json here").is_err());
    }
}
