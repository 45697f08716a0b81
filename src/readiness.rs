//! Pre-flight smoke test for the RAG service.

use crate::collector::{RespondOutcome, ResponseCollector};

/// Fixed probe question used by the readiness check.
pub const PROBE_QUESTION: &str = "test question";

/// Passage budget for the probe.
const PROBE_TOP_K: usize = 1;

/// Ask the service one probe question before committing to a full batch.
///
/// Returns true only when the probe comes back with an answer and at least
/// one context. Every failure mode (the service not being wired up, raising
/// internally, or retrieving nothing) is a normal "not ready" result, never
/// a crash.
pub async fn check_service_ready(collector: &ResponseCollector) -> bool {
    match collector.respond(PROBE_QUESTION, PROBE_TOP_K).await {
        RespondOutcome::Answered { contexts, .. } => {
            if contexts.is_empty() {
                println!("RAG service not responding properly");
                return false;
            }
            println!("RAG service is ready for evaluation");
            true
        }
        RespondOutcome::Skipped(reason) => {
            println!("RAG system not ready: {}", reason);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvalError, Result};
    use crate::rag::{RagResponse, RagService, RetrievedPassage};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct HealthyService;

    #[async_trait]
    impl RagService for HealthyService {
        async fn answer(&self, _question: &str, _top_k: usize) -> Result<RagResponse> {
            Ok(RagResponse {
                answer: "probe answer".to_string(),
                passages: vec![RetrievedPassage::PlainText("probe chunk".to_string())],
            })
        }
    }

    struct FailingService;

    #[async_trait]
    impl RagService for FailingService {
        async fn answer(&self, _question: &str, _top_k: usize) -> Result<RagResponse> {
            Err(EvalError::Http("backend exploded".to_string()))
        }
    }

    #[tokio::test]
    async fn test_ready_when_probe_answers() {
        let collector = ResponseCollector::new(Some(Arc::new(HealthyService)));
        assert!(check_service_ready(&collector).await);
    }

    #[tokio::test]
    async fn test_not_ready_when_probe_raises() {
        let collector = ResponseCollector::new(Some(Arc::new(FailingService)));
        assert!(!check_service_ready(&collector).await);
    }

    #[tokio::test]
    async fn test_not_ready_without_service() {
        let collector = ResponseCollector::new(None);
        assert!(!check_service_ready(&collector).await);
    }
}
