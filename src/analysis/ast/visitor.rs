//! Complexity visitor over the reduced source model

use crate::analysis::ast::model::{NodeKind, SourceModel, SourceNode};
use crate::analysis::ComplexityMetrics;

/// Walks every callable body independently, accumulating branch points.
///
/// Each callable starts at complexity 1 (the straight-line path) and gains 1
/// per conditional, loop, non-default switch label, catch clause, ternary and
/// short-circuit operator in its own body. Nested callables carry their own
/// count; their branch points never inflate the enclosing callable. Branch
/// points outside any callable body (field initializers) are ignored.
#[derive(Debug, Default)]
pub struct ComplexityVisitor {
    total_complexity: u32,
    callable_count: u32,
    callable_stack: Vec<u32>,
}

enum Step<'a> {
    Enter(&'a SourceNode),
    LeaveCallable,
}

impl ComplexityVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit the whole model iteratively to survive deeply nested trees
    pub fn visit_model(&mut self, model: &SourceModel) {
        let mut steps: Vec<Step<'_>> = model.nodes.iter().rev().map(Step::Enter).collect();

        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(node) => {
                    match node.kind {
                        NodeKind::Callable(_) => {
                            self.callable_stack.push(1);
                            steps.push(Step::LeaveCallable);
                        }
                        kind if is_branch_point(kind) => {
                            if let Some(current) = self.callable_stack.last_mut() {
                                *current += 1;
                            }
                        }
                        _ => {}
                    }
                    for child in node.children.iter().rev() {
                        steps.push(Step::Enter(child));
                    }
                }
                Step::LeaveCallable => {
                    if let Some(count) = self.callable_stack.pop() {
                        self.total_complexity += count;
                        self.callable_count += 1;
                    }
                }
            }
        }
    }

    pub fn build_metrics(&self) -> ComplexityMetrics {
        ComplexityMetrics {
            total_cyclomatic_complexity: self.total_complexity,
            analyzed_callable_count: self.callable_count,
        }
    }
}

fn is_branch_point(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Conditional
            | NodeKind::Loop(_)
            | NodeKind::SwitchLabel { default: false }
            | NodeKind::CatchClause
            | NodeKind::Ternary
            | NodeKind::LogicalOp(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ast::parser::JavaParser;

    fn metrics_for(source: &str) -> ComplexityMetrics {
        let model = JavaParser::parse(source).expect("test source should parse");
        let mut visitor = ComplexityVisitor::new();
        visitor.visit_model(&model);
        visitor.build_metrics()
    }

    #[test]
    fn test_unit_without_callables_scores_zero() {
        let metrics = metrics_for("public interface Marker {}\n");
        assert_eq!(metrics.analyzed_callable_count, 0);
        assert_eq!(metrics.total_cyclomatic_complexity, 0);
        assert_eq!(metrics.average_complexity(), 0);
    }

    #[test]
    fn test_straight_line_method_has_base_complexity() {
        let metrics = metrics_for(
            "public class C {\n    public int id(int x) {\n        return x;\n    }\n}\n",
        );
        assert_eq!(metrics.analyzed_callable_count, 1);
        assert_eq!(metrics.total_cyclomatic_complexity, 1);
    }

    #[test]
    fn test_if_with_logical_and_counts_three() {
        // 1 base + 1 if + 1 &&
        let metrics = metrics_for(
            r#"
public class C {
    public int check(int x) {
        if (x > 0 && x < 10) {
            return x;
        }
        return 0;
    }
}
"#,
        );
        assert_eq!(metrics.analyzed_callable_count, 1);
        assert_eq!(metrics.total_cyclomatic_complexity, 3);
        assert_eq!(metrics.average_complexity(), 3);
    }

    #[test]
    fn test_each_loop_form_increments_once() {
        let metrics = metrics_for(
            r#"
public class C {
    public int loops(int[] xs) {
        int sum = 0;
        for (int i = 0; i < xs.length; i++) {
            sum += xs[i];
        }
        for (int x : xs) {
            sum += x;
        }
        while (sum > 100) {
            sum /= 2;
        }
        do {
            sum++;
        } while (sum < 0);
        return sum;
    }
}
"#,
        );
        // 1 base + 4 loops
        assert_eq!(metrics.total_cyclomatic_complexity, 5);
    }

    #[test]
    fn test_switch_counts_labeled_branches_not_default() {
        let metrics = metrics_for(
            r#"
public class C {
    public int map(int n) {
        switch (n) {
            case 1:
                return 10;
            case 2:
                return 20;
            default:
                return 0;
        }
    }
}
"#,
        );
        // 1 base + 2 case labels; the default label does not count
        assert_eq!(metrics.total_cyclomatic_complexity, 3);
    }

    #[test]
    fn test_catch_and_ternary_increment() {
        let metrics = metrics_for(
            r#"
public class C {
    public int safeDiv(int a, int b) {
        try {
            return a / b;
        } catch (ArithmeticException e) {
            return b == 0 ? 0 : -1;
        }
    }
}
"#,
        );
        // 1 base + 1 catch + 1 ternary
        assert_eq!(metrics.total_cyclomatic_complexity, 3);
    }

    /// Nested callables are independent: a lambda's branches stay out of the
    /// enclosing method's count, and each contributes its own base 1.
    #[test]
    fn test_lambda_is_an_independent_callable() {
        let metrics = metrics_for(
            r#"
public class C {
    public Runnable make(boolean flag) {
        return () -> {
            if (flag) {
                System.out.println("on");
            }
        };
    }
}
"#,
        );
        assert_eq!(metrics.analyzed_callable_count, 2);
        // method: 1, lambda: 1 base + 1 if
        assert_eq!(metrics.total_cyclomatic_complexity, 3);
        assert_eq!(metrics.average_complexity(), 2); // 3/2 rounds half-up
    }

    #[test]
    fn test_constructor_is_a_callable() {
        let metrics = metrics_for(
            r#"
public class C {
    private final int n;

    public C(int n) {
        if (n < 0) {
            throw new IllegalArgumentException("negative");
        }
        this.n = n;
    }
}
"#,
        );
        assert_eq!(metrics.analyzed_callable_count, 1);
        assert_eq!(metrics.total_cyclomatic_complexity, 2);
    }

    #[test]
    fn test_field_initializer_branches_outside_callables_are_ignored() {
        let metrics = metrics_for(
            "public class C {\n    private static final int N = 1 > 0 ? 1 : 2;\n}\n",
        );
        assert_eq!(metrics.analyzed_callable_count, 0);
        assert_eq!(metrics.total_cyclomatic_complexity, 0);
    }
}
