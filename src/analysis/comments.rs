//! Comment density metrics for a compilation unit

use serde::{Deserialize, Serialize};

use crate::analysis::ast::SourceModel;

/// Comment and non-empty line counts, the raw inputs of the comment sub-score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentMetrics {
    pub comment_line_count: u32,
    pub non_empty_line_count: u32,
}

impl CommentMetrics {
    /// Collect counts from the model's comment spans and the raw text.
    ///
    /// Non-empty lines are counted over the entire unit, not just inside
    /// callables. A block comment contributes every physical line it spans;
    /// overlapping spans are summed literally, without deduplication.
    pub fn collect(model: &SourceModel, source: &str) -> Self {
        Self {
            comment_line_count: model.comments.iter().map(|span| span.line_count()).sum(),
            non_empty_line_count: count_non_empty_lines(source),
        }
    }

    /// Comment lines per non-empty line; 0.0 for an effectively empty unit.
    ///
    /// Not clamped: trailing comments sit on lines that also hold code, so the
    /// ratio may legitimately exceed 1.0.
    pub fn ratio(&self) -> f64 {
        if self.non_empty_line_count == 0 {
            return 0.0;
        }
        f64::from(self.comment_line_count) / f64::from(self.non_empty_line_count)
    }
}

/// Physical lines whose trimmed content is non-empty
pub fn count_non_empty_lines(source: &str) -> u32 {
    source.lines().filter(|line| !line.trim().is_empty()).count() as u32
}
