//! Scoring backend for the assembled evaluation dataset.
//!
//! This module provides:
//! - The [`ScoringBackend`] trait the harness consumes
//! - [`ScoreTable`], the row-oriented result shape
//! - An LLM-as-judge implementation of the four evaluated metrics

pub mod backend;
pub mod client;
pub mod judge;
pub mod metrics;

pub use backend::{RowScores, ScoreTable, ScoringBackend};
pub use client::JudgeClient;
pub use judge::LlmJudge;
pub use metrics::Metric;
