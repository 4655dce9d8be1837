//! Deterministic quality analysis for Java compilation units.
//!
//! One unit of source text goes through three independent measurements — an
//! AST-based cyclomatic-complexity visitor, comment-density extraction and a
//! line-based style check — and a pure scoring pass blends them into an
//! overall score in [0,100]. Raw metrics are persisted one-per-artifact
//! (upsert semantics); scores are derived again on every read so weight
//! changes never leave stale numbers behind.

/// Code analysis modules: AST parsing, complexity and comment metrics
pub mod analysis;

/// Orchestration of the full pipeline with per-key serialization
pub mod orchestrator;

/// Deterministic scoring of raw metrics
pub mod scoring;

/// Persistence collaborators: artifacts and analysis results
pub mod store;

/// Style checking over raw source text
pub mod style;

// Re-export commonly used types for convenience
pub use analysis::ast::{AstError, ComplexityVisitor, JavaParser, SourceModel};
pub use analysis::comments::CommentMetrics;
pub use analysis::ComplexityMetrics;
pub use orchestrator::{AnalysisOrchestrator, AnalysisReport, AnalyzeError};
pub use scoring::{ScoredReport, ScoringConfig};
pub use store::{AnalysisResult, AnalysisStore, CodeArtifact, InMemoryStore, RawMetrics};
pub use style::{LintStyleAnalyzer, StyleAnalyzer, StyleReport};
