//! RAG service contract and HTTP client.
//!
//! The service accepts a question plus a passage budget and returns an
//! answer string with the passages that supported it. The harness treats it
//! as an opaque collaborator; tests substitute their own implementation of
//! [`RagService`].

use crate::error::{EvalError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// A passage returned by the retrieval step.
///
/// Services disagree on the wire shape: some return bare strings, others an
/// object carrying a `content` field. Both deserialize here; callers get
/// plain text through [`RetrievedPassage::into_text`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RetrievedPassage {
    /// An object exposing the passage under a `content` field.
    Structured { content: String },
    /// A bare text blob.
    PlainText(String),
}

impl RetrievedPassage {
    /// Normalize to plain text.
    pub fn into_text(self) -> String {
        match self {
            RetrievedPassage::Structured { content } => content,
            RetrievedPassage::PlainText(text) => text,
        }
    }

    /// Borrow the passage text.
    pub fn as_text(&self) -> &str {
        match self {
            RetrievedPassage::Structured { content } => content,
            RetrievedPassage::PlainText(text) => text,
        }
    }
}

/// What the RAG service returns for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Retrieved passages, in retrieval order.
    pub passages: Vec<RetrievedPassage>,
}

/// The external RAG collaborator.
#[async_trait]
pub trait RagService: Send + Sync {
    /// Ask one question, requesting up to `top_k` supporting passages.
    async fn answer(&self, question: &str, top_k: usize) -> Result<RagResponse>;
}

/// Request body for the query endpoint.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
    top_k: usize,
}

/// Service error response.
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for a RAG service exposing a `/query` endpoint.
#[derive(Clone)]
pub struct HttpRagService {
    client: Client,
    api_base: String,
    api_key: String,
}

impl HttpRagService {
    /// Create a new client for the given base URL.
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    /// Get the query endpoint URL.
    fn endpoint(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/query", base)
    }
}

#[async_trait]
impl RagService for HttpRagService {
    async fn answer(&self, question: &str, top_k: usize) -> Result<RagResponse> {
        let request = QueryRequest { question, top_k };

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Try to parse as a structured service error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return Err(EvalError::Http(format!(
                    "RAG service error ({}): {}",
                    status, api_error.error.message
                )));
            }
            return Err(EvalError::Http(format!(
                "RAG request failed ({}): {}",
                status, body
            )));
        }

        let parsed: RagResponse = serde_json::from_str(&body).map_err(|e| {
            EvalError::Serialization(format!("Failed to parse RAG response: {}", e))
        })?;

        Ok(parsed)
    }
}
