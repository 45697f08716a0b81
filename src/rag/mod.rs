//! External RAG service collaborator.
//!
//! The retrieval + generation pipeline is not implemented here. This module
//! defines the contract the harness consumes and an HTTP client for a
//! service implementing it.

pub mod service;

pub use service::{HttpRagService, RagResponse, RagService, RetrievedPassage};
