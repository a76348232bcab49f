//! Integration tests for upload validation, file introspection and export
//!
//! These tests verify:
//! - Picker and typed-path uploads share one accept/reject decision
//! - Row/column estimates for CSV and JSON files on disk
//! - Every introspection failure maps to "stats unknown"
//! - Export artifacts (plain and zipped) and writing them to disk

use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use daner::models::{AppSettings, AppState, CsvDelimiter, FileStats, UploadedFile};
use daner::services::export::{
    EXPORT_BASE_NAME, build_artifact, exportable_operations, write_artifact,
};
use daner::services::{
    ExportError, ExportFormat, FileIntrospector, FileKind, IntrospectionError, UploadDecision,
    validate_upload,
};
use std::fs;
use std::io::{Cursor, Read};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> UploadedFile {
    let path = Utf8PathBuf::try_from(dir.path().join(name)).unwrap();
    fs::write(&path, content).unwrap();
    UploadedFile::from_path(path, content.len() as u64)
}

fn cleaned_state(operations: &[&str]) -> AppState {
    let mut state = AppState::default();
    state.upload_file(UploadedFile::from_bytes("data.csv", b"a,b\n1,2\n".to_vec()));
    for id in operations {
        state.toggle_operation(id);
    }
    state.request_apply(false);
    state
}

// ===== Upload validation =====

#[test]
fn test_validate_upload_decisions() {
    assert_eq!(validate_upload("sales.csv"), UploadDecision::Accepted(FileKind::Csv));
    assert_eq!(validate_upload("Report.XLSX"), UploadDecision::Accepted(FileKind::Excel));
    assert_eq!(validate_upload("legacy.xls"), UploadDecision::Accepted(FileKind::Excel));
    assert_eq!(validate_upload("rows.json"), UploadDecision::Accepted(FileKind::Json));

    for name in ["notes.txt", "archive.csv.zip", "csv", "data.jsonl"] {
        let decision = validate_upload(name);
        assert!(!decision.is_accepted(), "{} should be rejected", name);
        assert_eq!(
            decision.reason().as_deref(),
            Some("Unsupported file type. Please upload CSV, Excel, or JSON files.")
        );
    }
}

// ===== Introspection =====

#[tokio::test]
async fn test_inspect_csv_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "people.csv", "a,b,c\n1,2,3\n4,5,6\n");

    let stats = FileIntrospector::new().inspect(&file).await;

    assert_eq!(stats, Some(FileStats { rows: 2, columns: 3 }));
}

#[tokio::test]
async fn test_inspect_json_shapes_on_disk() {
    let dir = TempDir::new().unwrap();
    let introspector = FileIntrospector::new();

    let array = write_file(&dir, "array.json", r#"[{"a":1},{"a":2}]"#);
    assert_eq!(
        introspector.inspect(&array).await,
        Some(FileStats { rows: 2, columns: 1 })
    );

    let object = write_file(&dir, "object.json", r#"{"a":1,"b":2}"#);
    assert_eq!(
        introspector.inspect(&object).await,
        Some(FileStats { rows: 1, columns: 2 })
    );

    let scalar = write_file(&dir, "scalar.json", "42");
    assert_eq!(introspector.inspect(&scalar).await, None);
}

#[tokio::test]
async fn test_inspect_excel_is_placeholder() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "book.xlsx", "PK\u{3}\u{4} binary");

    assert_eq!(
        FileIntrospector::new().inspect(&file).await,
        Some(FileStats::default())
    );
}

#[tokio::test]
async fn test_inspect_failures_are_unknown_stats() {
    let dir = TempDir::new().unwrap();
    let introspector = FileIntrospector::new();

    let broken = write_file(&dir, "broken.json", "{ not json");
    assert_eq!(introspector.inspect(&broken).await, None);
    assert!(matches!(
        introspector.try_inspect(&broken).await,
        Err(IntrospectionError::Json(_))
    ));

    let empty = write_file(&dir, "empty.csv", "");
    assert!(matches!(
        introspector.try_inspect(&empty).await,
        Err(IntrospectionError::Empty)
    ));

    let missing_path = Utf8PathBuf::try_from(dir.path().join("gone.csv")).unwrap();
    let missing = UploadedFile::from_path(missing_path, 0);
    assert_eq!(introspector.inspect(&missing).await, None);
    assert!(matches!(
        introspector.try_inspect(&missing).await,
        Err(IntrospectionError::Read { .. })
    ));
}

// ===== Export =====

#[test]
fn test_export_requires_cleaned_state() {
    let mut state = AppState::default();
    assert!(matches!(
        exportable_operations(&state),
        Err(ExportError::NotCleaned)
    ));

    state.upload_file(UploadedFile::from_bytes("a.csv", b"x".to_vec()));
    state.toggle_operation("duplicates");
    assert!(matches!(
        exportable_operations(&state),
        Err(ExportError::NotCleaned)
    ));
}

#[test]
fn test_export_operations_keep_selection_order() {
    let state = cleaned_state(&["outliers", "duplicates", "encode"]);
    assert_eq!(
        exportable_operations(&state).unwrap(),
        vec!["outliers", "duplicates", "encode"]
    );
}

#[test]
fn test_plain_json_export_with_metadata() {
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let state = cleaned_state(&["missing"]);
    let operations = exportable_operations(&state).unwrap();

    let artifact =
        build_artifact(ExportFormat::Json, &AppSettings::default(), &operations, now).unwrap();

    assert_eq!(artifact.file_name, format!("{}.json", EXPORT_BASE_NAME));
    assert_eq!(artifact.mime_type, "application/json");

    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(value["data"].as_array().unwrap().len(), 5);
    assert_eq!(value["metadata"]["exportDate"], "2024-01-02T03:04:05.000Z");
    assert_eq!(value["metadata"]["operationsApplied"][0], "missing");
    assert_eq!(value["metadata"]["rowCount"], 5);
}

#[test]
fn test_plain_json_export_without_metadata_is_row_array() {
    let settings = AppSettings {
        include_metadata: false,
        ..Default::default()
    };
    let artifact = build_artifact(ExportFormat::Json, &settings, &[], Utc::now()).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["name"], "Alice Johnson");
}

#[test]
fn test_zipped_csv_export_contains_metadata_entry_first() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let settings = AppSettings {
        compress_exports: true,
        csv_delimiter: CsvDelimiter::Pipe,
        ..Default::default()
    };
    let operations = vec!["formats".to_string()];

    let artifact = build_artifact(ExportFormat::Csv, &settings, &operations, now).unwrap();
    assert_eq!(artifact.file_name, "cleaned_data.zip");
    assert_eq!(artifact.mime_type, "application/zip");

    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut metadata = String::new();
    archive
        .by_index(0)
        .unwrap()
        .read_to_string(&mut metadata)
        .unwrap();
    let metadata: serde_json::Value = serde_json::from_str(&metadata).unwrap();
    assert_eq!(metadata["format"], "csv");
    assert_eq!(metadata["operationsApplied"][0], "formats");

    let mut entry = archive.by_index(1).unwrap();
    assert_eq!(entry.name(), "cleaned_data.csv");
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    assert!(content.starts_with("ID|Name|Email|Age|City\n"));
    assert_eq!(content.lines().count(), 6);
}

#[test]
fn test_zipped_json_export_has_no_separate_metadata() {
    let settings = AppSettings {
        compress_exports: true,
        ..Default::default()
    };
    let artifact = build_artifact(ExportFormat::Json, &settings, &[], Utc::now()).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.by_index(0).unwrap().name(), "cleaned_data.json");
}

#[tokio::test]
async fn test_write_artifact_to_disk() {
    let dir = TempDir::new().unwrap();
    let settings = AppSettings::default();
    let artifact = build_artifact(ExportFormat::Xlsx, &settings, &[], Utc::now()).unwrap();
    let path = Utf8PathBuf::try_from(dir.path().join(&artifact.file_name)).unwrap();

    write_artifact(&artifact, &path).await.unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("ID,Name,Email,Age,City\n"));
    assert_eq!(
        artifact.mime_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}

#[tokio::test]
async fn test_write_artifact_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let artifact = build_artifact(ExportFormat::Csv, &AppSettings::default(), &[], Utc::now())
        .unwrap();
    let path = Utf8PathBuf::try_from(dir.path().join("no-such-dir").join("out.csv")).unwrap();

    assert!(matches!(
        write_artifact(&artifact, &path).await,
        Err(ExportError::Io(_))
    ));
}
