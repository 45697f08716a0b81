//! Best-effort collection of RAG responses for a question batch.
//!
//! One bad question must not abort a long batch: every per-question failure
//! mode folds into a skip, and the batch continues. What *is* preserved is
//! which questions succeeded, so ground-truth answers can be re-aligned
//! afterwards.

use crate::rag::{RagService, RetrievedPassage};
use std::sync::Arc;
use tracing::warn;

/// Default number of passages requested per question.
pub const DEFAULT_TOP_K: usize = 5;

/// Why a question was skipped during collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No RAG service was wired up at construction time.
    ServiceUnavailable,
    /// The service answered but retrieved zero passages.
    NoPassages,
    /// The service returned an empty answer string.
    EmptyAnswer,
    /// The service call itself failed.
    ServiceError(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ServiceUnavailable => write!(f, "RAG service not available"),
            SkipReason::NoPassages => write!(f, "no passages retrieved"),
            SkipReason::EmptyAnswer => write!(f, "empty answer"),
            SkipReason::ServiceError(msg) => write!(f, "service error: {}", msg),
        }
    }
}

/// Outcome of asking the RAG service one question.
#[derive(Debug, Clone)]
pub enum RespondOutcome {
    /// The service produced an answer and at least one context.
    Answered {
        answer: String,
        contexts: Vec<String>,
    },
    /// The question was skipped; the reason says why.
    Skipped(SkipReason),
}

/// A question that produced no usable response.
#[derive(Debug, Clone)]
pub struct SkippedQuestion {
    /// Original index of the question in the input sequence.
    pub index: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Responses collected over a question batch.
///
/// `answers`, `contexts`, and `success_indices` are filtered in lockstep:
/// position `i` in each refers to the same question, whose original index
/// is `success_indices[i]`.
#[derive(Debug, Clone, Default)]
pub struct CollectedResponses {
    /// RAG answers, one per successful question.
    pub answers: Vec<String>,
    /// Retrieved contexts, one list per successful question.
    pub contexts: Vec<Vec<String>>,
    /// Original indices of the successful questions.
    pub success_indices: Vec<usize>,
    /// Questions that produced no usable response.
    pub skipped: Vec<SkippedQuestion>,
}

impl CollectedResponses {
    /// Number of successful responses.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// Check if nothing succeeded.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Drives the external RAG service over a question sequence.
///
/// Holds a nullable service handle rather than consulting ambient state;
/// a collector built with `None` treats every question as unanswerable.
pub struct ResponseCollector {
    service: Option<Arc<dyn RagService>>,
}

impl ResponseCollector {
    /// Create a collector over the given service handle.
    pub fn new(service: Option<Arc<dyn RagService>>) -> Self {
        Self { service }
    }

    /// Whether a RAG service is wired up at all.
    pub fn service_available(&self) -> bool {
        self.service.is_some()
    }

    /// Ask the service one question, requesting `top_k` passages.
    ///
    /// Never returns an error: a missing backend, a failed call, zero
    /// retrieved passages, and an empty answer all fold into
    /// [`RespondOutcome::Skipped`].
    pub async fn respond(&self, question: &str, top_k: usize) -> RespondOutcome {
        let Some(service) = &self.service else {
            return RespondOutcome::Skipped(SkipReason::ServiceUnavailable);
        };

        let response = match service.answer(question, top_k).await {
            Ok(response) => response,
            Err(e) => return RespondOutcome::Skipped(SkipReason::ServiceError(e.to_string())),
        };

        if response.passages.is_empty() {
            return RespondOutcome::Skipped(SkipReason::NoPassages);
        }

        if response.answer.trim().is_empty() {
            return RespondOutcome::Skipped(SkipReason::EmptyAnswer);
        }

        let contexts = response
            .passages
            .into_iter()
            .map(RetrievedPassage::into_text)
            .collect();

        RespondOutcome::Answered {
            answer: response.answer,
            contexts,
        }
    }

    /// Collect responses for all questions, in order, one call at a time.
    ///
    /// `max_questions` truncates the batch to its first N questions. A
    /// skipped question leaves no placeholder in the output sequences; its
    /// original index and reason land in `skipped` instead.
    pub async fn collect(
        &self,
        questions: &[String],
        top_k: usize,
        max_questions: Option<usize>,
    ) -> CollectedResponses {
        let questions = match max_questions {
            Some(max) => {
                println!("Processing first {} questions for evaluation", max);
                &questions[..questions.len().min(max)]
            }
            None => questions,
        };

        let mut collected = CollectedResponses::default();

        println!(
            "\nCollecting RAG responses for {} questions...",
            questions.len()
        );

        for (i, question) in questions.iter().enumerate() {
            println!("\n{}. Question: {}", i + 1, question);

            match self.respond(question, top_k).await {
                RespondOutcome::Answered { answer, contexts } => {
                    println!("   Retrieved {} chunks", contexts.len());
                    collected.answers.push(answer);
                    collected.contexts.push(contexts);
                    collected.success_indices.push(i);
                }
                RespondOutcome::Skipped(reason) => {
                    println!("   Failed to get response ({})", reason);
                    warn!(index = i, %reason, "skipping question");
                    collected.skipped.push(SkippedQuestion { index: i, reason });
                }
            }
        }

        println!(
            "\nSuccessfully collected {} responses out of {} questions",
            collected.len(),
            questions.len()
        );

        collected
    }
}
