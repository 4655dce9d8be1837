//! Persistence collaborators: artifacts and their analysis results
//!
//! The analysis core treats storage as a narrow database-shaped dependency
//! behind [`AnalysisStore`]. The invariant the trait must uphold: at most one
//! [`AnalysisResult`] exists per artifact key at any time — `upsert_result`
//! replaces the whole record atomically and deleting an artifact cascades to
//! its result.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::analysis::comments::CommentMetrics;
use crate::analysis::ComplexityMetrics;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Uploaded compilation unit with counts derived at parse time.
///
/// Content changes only through the explicit update operation, which also
/// refreshes the derived counts; they are `None` while the content has never
/// parsed successfully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeArtifact {
    pub key: String,
    pub file_name: String,
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
    pub type_declaration_count: Option<u32>,
    pub method_count: Option<u32>,
    pub total_line_count: Option<u32>,
    pub non_empty_line_count: Option<u32>,
}

/// Durable metric fields of an analysis.
///
/// `None` is the explicit "could not measure" state: a parse failure leaves
/// `complexity` and `comments` absent, a style-checker fault leaves
/// `style_issue_count` absent. Never conflated with a measured zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    pub style_issue_count: Option<u32>,
    pub complexity: Option<ComplexityMetrics>,
    pub comments: Option<CommentMetrics>,
}

/// Persisted per-artifact analysis record, keyed 1:1 by artifact identity.
///
/// Only raw metrics are durable; scores are derived on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub artifact_key: String,
    #[serde(flatten)]
    pub metrics: RawMetrics,
    pub analyzed_at: DateTime<Utc>,
}

/// Database-shaped dependency of the analysis pipeline
pub trait AnalysisStore: Send + Sync {
    fn find_artifact(&self, key: &str) -> Result<Option<CodeArtifact>, StoreError>;

    /// Insert or replace the artifact stored under its key
    fn put_artifact(&self, artifact: CodeArtifact) -> Result<CodeArtifact, StoreError>;

    /// Remove an artifact, cascading to its analysis result. Returns whether
    /// an artifact existed.
    fn delete_artifact(&self, key: &str) -> Result<bool, StoreError>;

    fn find_result(&self, key: &str) -> Result<Option<AnalysisResult>, StoreError>;

    /// Insert or overwrite the single result for the artifact key, never
    /// producing a second record for the same artifact
    fn upsert_result(&self, result: AnalysisResult) -> Result<AnalysisResult, StoreError>;
}

impl<S: AnalysisStore + ?Sized> AnalysisStore for Arc<S> {
    fn find_artifact(&self, key: &str) -> Result<Option<CodeArtifact>, StoreError> {
        (**self).find_artifact(key)
    }

    fn put_artifact(&self, artifact: CodeArtifact) -> Result<CodeArtifact, StoreError> {
        (**self).put_artifact(artifact)
    }

    fn delete_artifact(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete_artifact(key)
    }

    fn find_result(&self, key: &str) -> Result<Option<AnalysisResult>, StoreError> {
        (**self).find_result(key)
    }

    fn upsert_result(&self, result: AnalysisResult) -> Result<AnalysisResult, StoreError> {
        (**self).upsert_result(result)
    }
}

/// Concurrent in-memory store for tests and the CLI
#[derive(Debug, Default)]
pub struct InMemoryStore {
    artifacts: DashMap<String, CodeArtifact>,
    results: DashMap<String, AnalysisResult>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}

impl AnalysisStore for InMemoryStore {
    fn find_artifact(&self, key: &str) -> Result<Option<CodeArtifact>, StoreError> {
        Ok(self.artifacts.get(key).map(|entry| entry.value().clone()))
    }

    fn put_artifact(&self, artifact: CodeArtifact) -> Result<CodeArtifact, StoreError> {
        self.artifacts.insert(artifact.key.clone(), artifact.clone());
        Ok(artifact)
    }

    fn delete_artifact(&self, key: &str) -> Result<bool, StoreError> {
        let removed = self.artifacts.remove(key).is_some();
        if removed {
            self.results.remove(key);
        }
        Ok(removed)
    }

    fn find_result(&self, key: &str) -> Result<Option<AnalysisResult>, StoreError> {
        Ok(self.results.get(key).map(|entry| entry.value().clone()))
    }

    fn upsert_result(&self, result: AnalysisResult) -> Result<AnalysisResult, StoreError> {
        self.results.insert(result.artifact_key.clone(), result.clone());
        Ok(result)
    }
}
