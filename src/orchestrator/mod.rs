//! Orchestration of the analysis pipeline
//!
//! Sequences style checking, parsing, metric extraction, the persisted upsert
//! and scoring for one artifact at a time. Calls for the same artifact key are
//! serialized through a keyed lock table so concurrent re-analyses cannot race
//! on the upsert; different keys never contend.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::ast::{ComplexityVisitor, JavaParser};
use crate::analysis::comments::{count_non_empty_lines, CommentMetrics};
use crate::scoring::{ScoredReport, ScoringConfig};
use crate::store::{AnalysisResult, AnalysisStore, CodeArtifact, RawMetrics, StoreError};
use crate::style::StyleAnalyzer;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no code artifact found for key '{0}'")]
    NotFound(String),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

/// Everything one analysis produces: the stored raw metrics plus the derived
/// quantities and transient scores, serializable for any outer surface.
///
/// `parse_error`/`style_error` carry the degraded-path diagnostics; they are
/// reported, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub average_complexity: Option<u32>,
    pub comment_ratio: Option<f64>,
    pub scores: ScoredReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_error: Option<String>,
}

/// Pipeline front door: owns the collaborators and the per-key serialization
pub struct AnalysisOrchestrator<S, C> {
    store: S,
    style: C,
    scoring: ScoringConfig,
    key_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: AnalysisStore, C: StyleAnalyzer> AnalysisOrchestrator<S, C> {
    pub fn new(store: S, style: C) -> Self {
        Self::with_scoring(store, style, ScoringConfig::default())
    }

    pub fn with_scoring(store: S, style: C, scoring: ScoringConfig) -> Self {
        Self {
            store,
            style,
            scoring,
            key_locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.key_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Analyze one artifact and upsert its result.
    ///
    /// Style checking runs on the raw text regardless of parse outcome. A
    /// parse failure degrades the analysis instead of failing it: complexity
    /// and comment metrics stay unmeasured and scoring re-normalizes onto the
    /// dimensions that exist. Only a missing artifact or a persistence fault
    /// fails the call.
    pub fn analyze(&self, key: &str) -> Result<AnalysisReport, AnalyzeError> {
        let lock = self.key_lock(key);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let artifact = self
            .store
            .find_artifact(key)?
            .ok_or_else(|| AnalyzeError::NotFound(key.to_string()))?;

        let (style_issue_count, style_error) = match self.style.check(&artifact.content) {
            Ok(report) => {
                info!(key, issues = report.issue_count, "style check finished");
                (Some(report.issue_count), None)
            }
            Err(err) => {
                warn!(key, error = %err, "style checker fault, leaving the style metric unmeasured");
                (None, Some(err.to_string()))
            }
        };

        let (complexity, comments, parse_error) = match JavaParser::parse(&artifact.content) {
            Ok(model) => {
                let mut visitor = ComplexityVisitor::new();
                visitor.visit_model(&model);
                let complexity = visitor.build_metrics();
                let comments = CommentMetrics::collect(&model, &artifact.content);
                debug!(
                    key,
                    total = complexity.total_cyclomatic_complexity,
                    callables = complexity.analyzed_callable_count,
                    comment_lines = comments.comment_line_count,
                    "metrics extracted"
                );
                (Some(complexity), Some(comments), None)
            }
            Err(err) => {
                warn!(key, error = %err, "parse failed, continuing with style metrics only");
                (None, None, Some(err.to_string()))
            }
        };

        let stored = self.store.upsert_result(AnalysisResult {
            artifact_key: artifact.key.clone(),
            metrics: RawMetrics {
                style_issue_count,
                complexity,
                comments,
            },
            analyzed_at: Utc::now(),
        })?;

        let scores = self.scoring.score(&stored.metrics);
        info!(key, overall = ?scores.overall_score, "analysis stored");

        Ok(AnalysisReport {
            average_complexity: stored.metrics.complexity.map(|c| c.average_complexity()),
            comment_ratio: stored.metrics.comments.map(|c| c.ratio()),
            scores,
            parse_error,
            style_error,
            result: stored,
        })
    }

    /// Read path: fetch the stored result and recompute the transient scores
    /// from the current scoring configuration, without re-analyzing
    pub fn report(&self, key: &str) -> Result<AnalysisReport, AnalyzeError> {
        let stored = self
            .store
            .find_result(key)?
            .ok_or_else(|| AnalyzeError::NotFound(key.to_string()))?;

        let scores = self.scoring.score(&stored.metrics);
        Ok(AnalysisReport {
            average_complexity: stored.metrics.complexity.map(|c| c.average_complexity()),
            comment_ratio: stored.metrics.comments.map(|c| c.ratio()),
            scores,
            parse_error: None,
            style_error: None,
            result: stored,
        })
    }

    /// Store a new artifact, deriving declaration counts from a parse.
    ///
    /// A unit that does not parse is still stored; its derived counts stay
    /// unmeasured until an update brings parseable content.
    pub fn ingest(
        &self,
        key: &str,
        file_name: &str,
        content: String,
    ) -> Result<CodeArtifact, AnalyzeError> {
        let lock = self.key_lock(key);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let artifact = build_artifact(key, file_name, content);
        info!(key, file_name, "artifact ingested");
        Ok(self.store.put_artifact(artifact)?)
    }

    /// Explicit update-and-reanalyze entry point: replace the content and
    /// refresh the derived counts. Any stored result goes stale until the
    /// next `analyze` call.
    pub fn update_artifact(&self, key: &str, content: String) -> Result<CodeArtifact, AnalyzeError> {
        let lock = self.key_lock(key);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let existing = self
            .store
            .find_artifact(key)?
            .ok_or_else(|| AnalyzeError::NotFound(key.to_string()))?;

        let artifact = build_artifact(key, &existing.file_name, content);
        info!(key, "artifact content updated");
        Ok(self.store.put_artifact(artifact)?)
    }

    /// Delete the artifact; its analysis result goes with it
    pub fn delete_artifact(&self, key: &str) -> Result<(), AnalyzeError> {
        let lock = self.key_lock(key);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.store.delete_artifact(key)? {
            return Err(AnalyzeError::NotFound(key.to_string()));
        }
        info!(key, "artifact deleted");
        Ok(())
    }
}

fn build_artifact(key: &str, file_name: &str, content: String) -> CodeArtifact {
    let (type_declaration_count, method_count, total_line_count, non_empty_line_count) =
        match JavaParser::parse(&content) {
            Ok(model) => (
                Some(model.type_declaration_count()),
                Some(model.method_count()),
                Some(content.lines().count() as u32),
                Some(count_non_empty_lines(&content)),
            ),
            Err(err) => {
                warn!(key, error = %err, "artifact content does not parse, storing without derived counts");
                (None, None, None, None)
            }
        };

    CodeArtifact {
        key: key.to_string(),
        file_name: file_name.to_string(),
        content,
        uploaded_at: Utc::now(),
        type_declaration_count,
        method_count,
        total_line_count,
        non_empty_line_count,
    }
}
