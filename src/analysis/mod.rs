//! Code analysis modules: AST parsing, complexity and comment metrics
pub mod ast;
pub mod comments;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use ast::{ComplexityVisitor, JavaParser, SourceModel};
pub use comments::CommentMetrics;

/// Aggregate cyclomatic complexity over every analyzed callable of a unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub total_cyclomatic_complexity: u32,
    pub analyzed_callable_count: u32,
}

impl ComplexityMetrics {
    /// Average complexity per callable, rounded half-up; 0 with no callables.
    ///
    /// The rounded integer is what scoring consumes.
    pub fn average_complexity(&self) -> u32 {
        if self.analyzed_callable_count == 0 {
            return 0;
        }
        let average = f64::from(self.total_cyclomatic_complexity)
            / f64::from(self.analyzed_callable_count);
        average.round() as u32
    }
}
