use std::sync::Arc;
use std::time::Duration;

use crate::common::test_helpers::*;
use validate_hatom::config::{FileConfig, SessionConfig};
use validate_hatom::{
    BatchConfig, BatchValidator, FileDiscovery, Output, OutputFormat, SessionRegistry,
    ValidationStatus, VerbosityLevel,
};

fn create_validator() -> BatchValidator {
    let registry = Arc::new(SessionRegistry::new(&SessionConfig::default()));
    BatchValidator::new(
        registry,
        BatchConfig {
            max_concurrent_validations: 4,
            validation_timeout: Duration::from_secs(10),
            collect_metrics: true,
        },
    )
}

#[tokio::test]
async fn test_validate_site() {
    let env = TestEnvironment::new();
    env.populate_site().await;

    let validator = create_validator();
    let results = validator
        .validate_path(env.path(), &FileDiscovery::new())
        .await
        .unwrap();

    assert_eq!(results.total_files, 4);
    assert_eq!(results.valid_files, 2);
    assert_eq!(results.invalid_files, 1);
    assert_eq!(results.error_files, 1);
    assert_eq!(results.total_reports, 1);
    assert!(results.has_errors());

    let draft = results
        .file_results
        .iter()
        .find(|r| r.path.ends_with("draft.html"))
        .unwrap();
    assert_eq!(draft.status, ValidationStatus::Invalid { report_count: 1 });

    let broken = results
        .file_results
        .iter()
        .find(|r| r.path.ends_with("broken.htm"))
        .unwrap();
    assert!(broken.status.is_error());
}

#[tokio::test]
async fn test_sessions_survive_the_batch() {
    let env = TestEnvironment::new();
    let page = env.write_file("draft.html", TITLE_ONLY_ENTRY).await;

    let validator = create_validator();
    validator.validate_files(vec![page.clone()]).await.unwrap();

    let engine = validator
        .registry()
        .get_engine(&page.display().to_string())
        .unwrap();
    let engine = engine.lock().unwrap();
    assert_eq!(engine.reports().len(), 1);
}

#[tokio::test]
async fn test_discovery_filters() {
    let env = TestEnvironment::new();
    env.populate_site().await;

    let discovery = FileDiscovery::from_config(&FileConfig {
        extensions: vec!["html".to_string()],
        exclude_patterns: vec!["**/2008/**".to_string()],
        ..FileConfig::default()
    })
    .unwrap();

    let results = create_validator()
        .validate_path(env.path(), &discovery)
        .await
        .unwrap();

    assert_eq!(results.total_files, 1);
    assert!(results.all_valid());
}

#[tokio::test]
async fn test_output_formats() {
    let env = TestEnvironment::new();
    env.populate_site().await;

    let results = create_validator()
        .validate_path(env.path(), &FileDiscovery::new())
        .await
        .unwrap();

    let human = Output::new(VerbosityLevel::Normal, OutputFormat::Human)
        .with_colors(false)
        .format_results(&results);
    assert!(human.contains("draft.html"));
    assert!(human.contains("1 errors found"));
    assert!(human.contains("hentry must contain at least one entry-content or entry-summary"));
    assert!(human.contains("Validation Summary:"));

    let summary =
        Output::new(VerbosityLevel::Normal, OutputFormat::Summary).format_results(&results);
    assert_eq!(
        summary,
        "4 files: 2 valid, 1 invalid, 1 errors, 0 skipped, 1 reports\n"
    );

    let json = Output::new(VerbosityLevel::Normal, OutputFormat::Json).format_results(&results);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["total_files"], 4);
    assert_eq!(value["files"].as_array().unwrap().len(), 4);
}
