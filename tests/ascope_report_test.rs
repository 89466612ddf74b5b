use chrono::{Local, TimeZone};
use pr_div_tools::utils::error::ErrorSeverity;
use pr_div_tools::{AscopePipeline, EtlEngine, LocalStorage, ToolError};
use std::fs;
use tempfile::TempDir;

fn write_template(temp_dir: &TempDir, content: &str) {
    let data = temp_dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("ascope_template.json"), content).unwrap();
}

#[tokio::test]
async fn test_report_wraps_template_with_timestamp() {
    let temp_dir = TempDir::new().unwrap();
    write_template(
        &temp_dir,
        r#"{"template": {"Areas": ["Old San Juan"], "Structures": []}, "version": 2}"#,
    );
    let timestamp = Local.with_ymd_and_hms(2025, 1, 31, 23, 59, 58).unwrap();

    let pipeline = AscopePipeline::new(
        LocalStorage::new(temp_dir.path()),
        "data/ascope_template.json",
        "output/ascope_report.json",
    )
    .with_timestamp(timestamp);
    let path = EtlEngine::new(pipeline).run().await.unwrap();

    let text = fs::read_to_string(temp_dir.path().join(&path)).unwrap();
    assert!(text.contains("\n    \"report_id\""), "report uses 4-space indentation");

    let report: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["report_id"], "ASCOPE-20250131235958");
    assert_eq!(report["generated_at"], "2025-01-31T23:59:58");
    assert_eq!(
        report["content"],
        serde_json::json!({"Areas": ["Old San Juan"], "Structures": []})
    );
}

#[tokio::test]
async fn test_report_id_uses_clock_when_not_pinned() {
    let temp_dir = TempDir::new().unwrap();
    write_template(&temp_dir, r#"{"template": {"Areas": []}}"#);

    let pipeline = AscopePipeline::new(
        LocalStorage::new(temp_dir.path()),
        "data/ascope_template.json",
        "out/report.json",
    );
    EtlEngine::new(pipeline).run().await.unwrap();

    let text = fs::read_to_string(temp_dir.path().join("out/report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&text).unwrap();
    let id = report["report_id"].as_str().unwrap();
    let digits = id.strip_prefix("ASCOPE-").unwrap();
    assert_eq!(digits.len(), 14);
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_missing_template_is_low_severity() {
    let temp_dir = TempDir::new().unwrap();

    let pipeline = AscopePipeline::new(
        LocalStorage::new(temp_dir.path()),
        "data/ascope_template.json",
        "output/ascope_report.json",
    );
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, ToolError::NothingToDo { .. }));
    assert_eq!(err.severity(), ErrorSeverity::Low);
    assert_eq!(err.exit_code(), 0);
    assert!(!temp_dir.path().join("output").exists());
}

#[tokio::test]
async fn test_empty_template_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    write_template(&temp_dir, r#"{"template": {}}"#);

    let pipeline = AscopePipeline::new(
        LocalStorage::new(temp_dir.path()),
        "data/ascope_template.json",
        "output/ascope_report.json",
    );
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert_eq!(err.exit_code(), 0);
    assert!(!temp_dir.path().join("output").exists());
}

#[tokio::test]
async fn test_invalid_json_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    write_template(&temp_dir, "{ not json");

    let pipeline = AscopePipeline::new(
        LocalStorage::new(temp_dir.path()),
        "data/ascope_template.json",
        "output/ascope_report.json",
    );
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, ToolError::SerializationError(_)));
    assert_ne!(err.exit_code(), 0);
}
