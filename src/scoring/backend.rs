//! Scoring backend contract and its tabular output.

use crate::dataset::EvaluationDataset;
use crate::error::Result;
use crate::scoring::metrics::Metric;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores for one dataset row, keyed by metric column name.
///
/// A row may lack a column when the backend failed to score it; downstream
/// consumers treat a hole in a column as schema drift for that column, not
/// as a fatal condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowScores {
    /// The question this row scored.
    pub question: String,
    /// One float per metric column present on this row.
    #[serde(flatten)]
    pub scores: BTreeMap<String, f64>,
}

/// Row-oriented scoring output: one record per dataset row, one optional
/// float column per requested metric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreTable {
    rows: Vec<RowScores>,
}

impl ScoreTable {
    /// Build a table from row records.
    pub fn new(rows: Vec<RowScores>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row records.
    pub fn rows(&self) -> &[RowScores] {
        &self.rows
    }

    /// Extract a full metric column.
    ///
    /// Returns `None` unless every row carries the column.
    pub fn column(&self, metric_name: &str) -> Option<Vec<f64>> {
        if self.rows.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .map(|row| row.scores.get(metric_name).copied())
            .collect()
    }

    /// Convert to plain row-oriented JSON values for persistence.
    pub fn to_rows(&self) -> Vec<serde_json::Value> {
        self.rows
            .iter()
            .filter_map(|row| serde_json::to_value(row).ok())
            .collect()
    }
}

/// The external scoring collaborator.
///
/// Accepts the four-column dataset and returns one float column per
/// requested metric, row-aligned with the input.
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    /// Score every dataset row on every requested metric.
    async fn evaluate(&self, dataset: &EvaluationDataset, metrics: &[Metric])
        -> Result<ScoreTable>;
}
