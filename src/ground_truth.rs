//! Ground-truth dataset loading.
//!
//! The ground truth is a hand-authored, read-only JSON file pairing each
//! question with its expected answer. It is loaded once per run; the record
//! order in the file is preserved everywhere downstream.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How hard a question is expected to be. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A single hand-authored question/answer pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruthRecord {
    /// The question to ask the RAG system.
    pub question: String,
    /// The expected answer.
    pub answer: String,
    /// Where in the source document the answer lives. Not used in scoring.
    pub context_hint: String,
    /// Question difficulty.
    pub difficulty: Difficulty,
}

/// Dataset-level metadata from the ground-truth file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruthMetadata {
    /// Free-form description of the dataset.
    pub description: String,
    /// Question categories covered.
    pub categories: Vec<String>,
    /// Total number of questions the author intended.
    pub total_questions: usize,
}

/// The full ground-truth dataset as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruthData {
    /// Dataset metadata.
    pub metadata: GroundTruthMetadata,
    /// Ordered question/answer records.
    pub ground_truth: Vec<GroundTruthRecord>,
}

impl GroundTruthData {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.ground_truth.len()
    }

    /// Check if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.ground_truth.is_empty()
    }

    /// Split the records into two parallel sequences: questions and expected
    /// answers. Order and index correspondence are preserved, so
    /// `questions[i]` pairs with `answers[i]`.
    pub fn extract(&self) -> (Vec<String>, Vec<String>) {
        let questions = self
            .ground_truth
            .iter()
            .map(|r| r.question.clone())
            .collect();
        let answers = self.ground_truth.iter().map(|r| r.answer.clone()).collect();
        (questions, answers)
    }
}

/// Loads the ground-truth dataset from a fixed file path.
#[derive(Debug, Clone)]
pub struct GroundTruthStore {
    path: PathBuf,
}

impl GroundTruthStore {
    /// Create a store reading from the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this store reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the dataset.
    ///
    /// Fails with [`EvalError::GroundTruthNotFound`] if the file is absent.
    /// This is fatal for the run: there is nothing to evaluate against.
    pub fn load(&self) -> Result<GroundTruthData> {
        if !self.path.exists() {
            return Err(EvalError::GroundTruthNotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path).map_err(|e| EvalError::io(&self.path, e))?;

        let data: GroundTruthData = serde_json::from_str(&content).map_err(|e| {
            EvalError::Serialization(format!(
                "Failed to parse ground truth at '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        println!(
            "Loaded ground truth with {} questions from {}",
            data.len(),
            self.path.display()
        );

        Ok(data)
    }
}
