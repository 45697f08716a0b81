//! Error types for the evaluation harness.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur in the evaluation harness.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ground-truth dataset file does not exist.
    ///
    /// Ground truth is a required precondition for the entire run, so this
    /// aborts immediately and is never retried.
    #[error("Ground truth dataset not found at '{0}'")]
    GroundTruthNotFound(PathBuf),

    /// Column lengths disagree when assembling the evaluation dataset.
    #[error(
        "Dataset length mismatch: {questions} questions, {answers} answers, \
         {contexts} context lists, {ground_truth} ground-truth answers"
    )]
    Validation {
        questions: usize,
        answers: usize,
        contexts: usize,
        ground_truth: usize,
    },

    /// No question produced a usable RAG response; there is nothing to score.
    #[error("No successful RAG responses out of {attempted} questions")]
    NoResponses { attempted: usize },

    /// The RAG service failed its readiness probe before the batch started.
    #[error("RAG service is not ready for evaluation")]
    ServiceNotReady,

    /// Error during serialization/deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The scoring backend's API rejected or failed a request.
    #[error("Scorer API error: {0}")]
    ScorerApi(String),

    /// The scoring backend returned a response we could not parse.
    #[error("Failed to parse scorer response: {0}")]
    ScorerParse(String),
}

impl EvalError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        EvalError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::Serialization(err.to_string())
    }
}
