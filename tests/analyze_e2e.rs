//! End-to-end pipeline tests over the public API

use std::fs;
use std::sync::Arc;
use std::thread;

use coderater::{
    AnalysisOrchestrator, InMemoryStore, LintStyleAnalyzer, ScoringConfig,
};

const SAMPLE_PATH: &str = "test_data/OrderProcessor.java";

fn orchestrator() -> AnalysisOrchestrator<InMemoryStore, LintStyleAnalyzer> {
    AnalysisOrchestrator::new(InMemoryStore::new(), LintStyleAnalyzer::default())
}

#[test]
fn e2e_sample_unit_full_pipeline() {
    let content = fs::read_to_string(SAMPLE_PATH).expect("sample file readable");
    let orchestrator = orchestrator();
    orchestrator
        .ingest("orders", "OrderProcessor.java", content)
        .unwrap();

    let report = orchestrator.analyze("orders").unwrap();
    let metrics = &report.result.metrics;

    let complexity = metrics.complexity.expect("unit parses");
    assert_eq!(complexity.analyzed_callable_count, 3);
    // applyDiscount: 1 + 2 cases + ternary; countValid: 1 + for-each + if + &&;
    // retryDelivery: 1 + for + catch
    assert_eq!(complexity.total_cyclomatic_complexity, 11);
    assert_eq!(report.average_complexity, Some(4));

    let comments = metrics.comments.expect("unit parses");
    assert_eq!(comments.comment_line_count, 5);
    assert_eq!(comments.non_empty_line_count, 40);

    assert_eq!(metrics.style_issue_count, Some(0));
    assert_eq!(report.scores.style_score, Some(100));
    assert_eq!(report.scores.complexity_score, Some(100));
    assert_eq!(report.scores.comment_score, Some(100));
    assert_eq!(report.scores.overall_score, Some(100));
}

#[test]
fn e2e_analyze_is_idempotent() {
    let content = fs::read_to_string(SAMPLE_PATH).expect("sample file readable");
    let orchestrator = orchestrator();
    orchestrator
        .ingest("orders", "OrderProcessor.java", content)
        .unwrap();

    let first = orchestrator.analyze("orders").unwrap();
    let second = orchestrator.analyze("orders").unwrap();

    assert_eq!(first.result.metrics, second.result.metrics);
    assert_eq!(first.scores, second.scores);
    assert_eq!(orchestrator.store().result_count(), 1);
}

#[test]
fn e2e_reanalysis_upserts_a_single_result() {
    let orchestrator = orchestrator();
    orchestrator
        .ingest(
            "unit",
            "A.java",
            "public class A {\n    public void a() {\n        call(1,2);\n    }\n}\n".to_string(),
        )
        .unwrap();
    let first = orchestrator.analyze("unit").unwrap();
    assert_eq!(first.result.metrics.style_issue_count, Some(1));

    orchestrator
        .update_artifact(
            "unit",
            "public class A {\n    public void a() {\n        call(1, 2);\n    }\n}\n".to_string(),
        )
        .unwrap();
    let second = orchestrator.analyze("unit").unwrap();

    // Exactly one record, reflecting the second content
    assert_eq!(orchestrator.store().result_count(), 1);
    assert_eq!(second.result.metrics.style_issue_count, Some(0));
}

#[test]
fn e2e_degraded_unit_keeps_style_metrics() {
    let content = fs::read_to_string("test_data/Broken.java").expect("sample file readable");
    let orchestrator = orchestrator();
    orchestrator
        .ingest("broken", "Broken.java", content)
        .unwrap();

    let report = orchestrator.analyze("broken").unwrap();
    assert!(report.parse_error.is_some());
    assert!(report.result.metrics.style_issue_count.is_some());
    assert_eq!(report.result.metrics.complexity, None);
    assert_eq!(report.result.metrics.comments, None);
    // Overall re-normalizes onto the style dimension alone
    assert_eq!(report.scores.overall_score, report.scores.style_score);
}

#[test]
fn e2e_concurrent_same_key_analyses_stay_serialized() {
    let content = fs::read_to_string(SAMPLE_PATH).expect("sample file readable");
    let orchestrator = Arc::new(orchestrator());
    orchestrator
        .ingest("orders", "OrderProcessor.java", content)
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let orchestrator = Arc::clone(&orchestrator);
            thread::spawn(move || orchestrator.analyze("orders"))
        })
        .collect();

    for handle in handles {
        let report = handle.join().expect("analysis thread").expect("analysis ok");
        assert_eq!(report.scores.overall_score, Some(100));
    }
    assert_eq!(orchestrator.store().result_count(), 1);
}

#[test]
fn e2e_independent_keys_analyze_in_parallel() {
    let orchestrator = Arc::new(orchestrator());
    for i in 0..4 {
        orchestrator
            .ingest(
                &format!("unit-{i}"),
                "C.java",
                "public class C {\n    public int id(int x) {\n        return x;\n    }\n}\n"
                    .to_string(),
            )
            .unwrap();
    }

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let orchestrator = Arc::clone(&orchestrator);
            thread::spawn(move || orchestrator.analyze(&format!("unit-{i}")))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("analysis thread").is_ok());
    }

    assert_eq!(orchestrator.store().result_count(), 4);
}

/// Scores are derived per read: the same stored raw metrics yield different
/// overall scores under different weight configurations.
#[test]
fn e2e_scores_follow_the_reading_configuration() {
    let store = Arc::new(InMemoryStore::new());
    let writer = AnalysisOrchestrator::new(Arc::clone(&store), LintStyleAnalyzer::default());
    writer
        .ingest(
            "unit",
            "A.java",
            "public class A {\n    public void a() {\n        call(1,2);\n    }\n}\n".to_string(),
        )
        .unwrap();
    let written = writer.analyze("unit").unwrap();
    assert_eq!(written.scores.style_score, Some(95));

    let style_only = ScoringConfig {
        weight_style: 1.0,
        weight_complexity: 0.0,
        weight_comment: 0.0,
        ..ScoringConfig::default()
    };
    let reader =
        AnalysisOrchestrator::with_scoring(store, LintStyleAnalyzer::default(), style_only);
    let read = reader.report("unit").unwrap();

    assert_eq!(read.result.metrics, written.result.metrics);
    assert_eq!(read.scores.overall_score, Some(95));
    assert_ne!(read.scores.overall_score, written.scores.overall_score);
}

#[test]
fn e2e_ingest_from_disk_roundtrip() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("Tmp.java");
    fs::write(
        &path,
        "// scratch unit\npublic class Tmp {\n    public void run() {\n    }\n}\n",
    )
    .expect("write sample");

    let content = fs::read_to_string(&path).expect("read sample");
    let orchestrator = orchestrator();
    let artifact = orchestrator
        .ingest(&path.display().to_string(), "Tmp.java", content)
        .unwrap();

    assert_eq!(artifact.type_declaration_count, Some(1));
    assert_eq!(artifact.method_count, Some(1));

    let report = orchestrator.analyze(&path.display().to_string()).unwrap();
    assert_eq!(
        report.result.metrics.comments.map(|c| c.comment_line_count),
        Some(1)
    );
}
