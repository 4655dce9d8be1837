//! Deterministic scoring of raw metrics
//!
//! Pure functions from raw metrics to three sub-scores in [0,100] and a
//! weighted overall score. Every weight and threshold is a named, overridable
//! field of [`ScoringConfig`]; the defaults are load-bearing, reports produced
//! with them must match earlier deployments byte for byte.
//!
//! Scores are never stored. They are recomputed from the durable raw metrics
//! on every read, so changing a weight constant never leaves stale scores
//! behind.

use serde::{Deserialize, Serialize};

use crate::store::RawMetrics;

/// Weights and thresholds of the scoring formulas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weight_style: f64,
    pub weight_complexity: f64,
    pub weight_comment: f64,

    /// Points lost per reported style issue
    pub style_deduction_per_issue: u32,

    pub complexity_ideal_max: u32,
    pub complexity_penalty_threshold: u32,
    pub complexity_upper_limit: u32,
    pub complexity_deduction_normal: u32,
    pub complexity_deduction_high: u32,

    pub comment_ratio_ideal_min: f64,
    pub comment_ratio_ideal_max: f64,
    /// Points lost per percentage point outside the ideal band
    pub comment_deduction_per_percent: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weight_style: 0.40,
            weight_complexity: 0.30,
            weight_comment: 0.30,
            style_deduction_per_issue: 5,
            complexity_ideal_max: 5,
            complexity_penalty_threshold: 10,
            complexity_upper_limit: 20,
            complexity_deduction_normal: 10,
            complexity_deduction_high: 15,
            comment_ratio_ideal_min: 0.10,
            comment_ratio_ideal_max: 0.30,
            comment_deduction_per_percent: 5,
        }
    }
}

/// Transient per-read scores; `None` mirrors an unmeasured input metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredReport {
    pub style_score: Option<u32>,
    pub complexity_score: Option<u32>,
    pub comment_score: Option<u32>,
    pub overall_score: Option<u32>,
}

impl ScoringConfig {
    /// 100 minus a fixed deduction per issue, floored at 0
    pub fn style_score(&self, style_issue_count: u32) -> u32 {
        100u32.saturating_sub(style_issue_count.saturating_mul(self.style_deduction_per_issue))
    }

    /// Piecewise deduction over the rounded average complexity: full marks up
    /// to the ideal, a normal rate up to the penalty threshold, a steeper rate
    /// beyond it, zero past the upper limit.
    pub fn complexity_score(&self, avg_complexity: u32) -> u32 {
        if avg_complexity <= self.complexity_ideal_max {
            return 100;
        }
        if avg_complexity > self.complexity_upper_limit {
            return 0;
        }

        let mut score = 100i64;
        if avg_complexity <= self.complexity_penalty_threshold {
            score -= i64::from(
                avg_complexity.saturating_sub(self.complexity_ideal_max)
                    * self.complexity_deduction_normal,
            );
        } else {
            score -= i64::from(
                self.complexity_penalty_threshold
                    .saturating_sub(self.complexity_ideal_max)
                    * self.complexity_deduction_normal,
            );
            score -= i64::from(
                avg_complexity.saturating_sub(self.complexity_penalty_threshold)
                    * self.complexity_deduction_high,
            );
        }
        score.max(0) as u32
    }

    /// Full marks inside the ideal band, a fixed deduction per percentage
    /// point of deviation outside it, floored at 0
    pub fn comment_score(&self, comment_ratio: f64) -> u32 {
        if comment_ratio >= self.comment_ratio_ideal_min
            && comment_ratio <= self.comment_ratio_ideal_max
        {
            return 100;
        }

        let deviation = if comment_ratio < self.comment_ratio_ideal_min {
            self.comment_ratio_ideal_min - comment_ratio
        } else {
            comment_ratio - self.comment_ratio_ideal_max
        };
        let deduction =
            (deviation * 100.0 * f64::from(self.comment_deduction_per_percent)).round() as i64;
        (100i64 - deduction).max(0) as u32
    }

    /// Score whatever metrics are available.
    ///
    /// An unmeasured metric yields an absent sub-score, and the overall blend
    /// re-normalizes the remaining weights so that "could not measure" is
    /// excluded rather than scored as zero or perfect. With every metric
    /// missing the overall score is absent too.
    pub fn score(&self, metrics: &RawMetrics) -> ScoredReport {
        let style_score = metrics.style_issue_count.map(|count| self.style_score(count));
        let complexity_score = metrics
            .complexity
            .map(|complexity| self.complexity_score(complexity.average_complexity()));
        let comment_score = metrics
            .comments
            .map(|comments| self.comment_score(comments.ratio()));

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (score, weight) in [
            (style_score, self.weight_style),
            (complexity_score, self.weight_complexity),
            (comment_score, self.weight_comment),
        ] {
            if let Some(score) = score {
                weighted_sum += f64::from(score) * weight;
                weight_sum += weight;
            }
        }

        let overall_score = if weight_sum > 0.0 {
            Some(((weighted_sum / weight_sum).round() as i64).clamp(0, 100) as u32)
        } else {
            None
        };

        ScoredReport {
            style_score,
            complexity_score,
            comment_score,
            overall_score,
        }
    }
}
