// Mock export of the cleaned dataset
//
// The exported rows are always the fixed sample dataset; the uploaded file is
// never read here. Settings decide the CSV delimiter, whether metadata is
// attached and whether the result is wrapped in a zip archive.

use crate::models::catalog::{SAMPLE_DATA, SAMPLE_HEADER, SampleRow};
use crate::models::{AppSettings, AppState, CleaningStep, CsvDelimiter};
use camino::Utf8Path;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::ZipWriter;
use zip::write::FileOptions;

/// Base name of every exported file.
pub const EXPORT_BASE_NAME: &str = "cleaned_data";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export is only available after cleaning has been applied")]
    NotCleaned,

    #[error("Failed to encode JSON export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to build export archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Comma-separated text with the spreadsheet content type.
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Xlsx => "Excel",
        }
    }
}

/// Metadata attached to an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_date: String,
    pub operations_applied: Vec<String>,
    pub row_count: usize,
    /// Only set for the separate `metadata.json` archive entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
}

impl ExportMetadata {
    pub fn new(operations: &[String], now: DateTime<Utc>) -> Self {
        Self {
            export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            operations_applied: operations.to_vec(),
            row_count: SAMPLE_DATA.len(),
            format: None,
        }
    }
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    metadata: &'a ExportMetadata,
    data: &'a [SampleRow],
}

/// Ready-to-save export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Operations to record in an export of `state`, in selection order.
///
/// Fails unless the dashboard has reached the cleaned step.
pub fn exportable_operations(state: &AppState) -> Result<Vec<String>, ExportError> {
    if state.step != CleaningStep::Cleaned {
        return Err(ExportError::NotCleaned);
    }
    Ok(state.selected_operations.iter().cloned().collect())
}

fn delimited(delimiter: char) -> String {
    let sep = delimiter.to_string();
    let mut content = SAMPLE_HEADER.join(sep.as_str());
    content.push('\n');
    for row in &SAMPLE_DATA {
        content.push_str(&row.fields().join(sep.as_str()));
        content.push('\n');
    }
    content
}

/// Encode the sample dataset as the uncompressed content of `format`.
pub fn encode_content(
    format: ExportFormat,
    settings: &AppSettings,
    operations: &[String],
    now: DateTime<Utc>,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => Ok(delimited(settings.csv_delimiter.as_char())),
        ExportFormat::Xlsx => Ok(delimited(CsvDelimiter::Comma.as_char())),
        ExportFormat::Json if settings.include_metadata => {
            let metadata = ExportMetadata::new(operations, now);
            Ok(serde_json::to_string_pretty(&JsonEnvelope {
                metadata: &metadata,
                data: &SAMPLE_DATA,
            })?)
        }
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&SAMPLE_DATA)?),
    }
}

/// Build the export file for `format`, zipped when `compressExports` is on.
///
/// # Arguments
/// * `operations` - Applied operation ids, recorded in the metadata
/// * `now` - Timestamp written as `exportDate`
pub fn build_artifact(
    format: ExportFormat,
    settings: &AppSettings,
    operations: &[String],
    now: DateTime<Utc>,
) -> Result<ExportArtifact, ExportError> {
    let content = encode_content(format, settings, operations, now)?;
    let file_name = format!("{}.{}", EXPORT_BASE_NAME, format.extension());

    if !settings.compress_exports {
        return Ok(ExportArtifact {
            file_name,
            mime_type: format.mime_type(),
            bytes: content.into_bytes(),
        });
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        FileOptions::<()>::default().compression_method(zip::CompressionMethod::Deflated);

    // JSON exports already embed their metadata
    if settings.include_metadata && format != ExportFormat::Json {
        let metadata = ExportMetadata {
            format: Some(format.extension()),
            ..ExportMetadata::new(operations, now)
        };
        zip.start_file("metadata.json", options)?;
        zip.write_all(serde_json::to_string_pretty(&metadata)?.as_bytes())?;
    }

    zip.start_file(file_name.as_str(), options)?;
    zip.write_all(content.as_bytes())?;
    let bytes = zip.finish()?.into_inner();

    Ok(ExportArtifact {
        file_name: format!("{}.zip", EXPORT_BASE_NAME),
        mime_type: "application/zip",
        bytes,
    })
}

/// Save `artifact` to `path`.
pub async fn write_artifact(artifact: &ExportArtifact, path: &Utf8Path) -> Result<(), ExportError> {
    tokio::fs::write(path, &artifact.bytes).await?;
    tracing::info!(
        "Exported {} ({} bytes) to {}",
        artifact.file_name,
        artifact.bytes.len(),
        path
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
    }

    fn ops() -> Vec<String> {
        vec!["duplicates".to_string(), "missing".to_string()]
    }

    #[test]
    fn test_csv_uses_delimiter_setting() {
        let settings = AppSettings {
            csv_delimiter: CsvDelimiter::Semicolon,
            ..Default::default()
        };
        let content = encode_content(ExportFormat::Csv, &settings, &ops(), fixed_now()).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "ID;Name;Email;Age;City");
        assert_eq!(lines[1], "1;Alice Johnson;alice@example.com;28;New York");
        assert_eq!(lines.len(), 6);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_xlsx_always_uses_comma() {
        let settings = AppSettings {
            csv_delimiter: CsvDelimiter::Tab,
            ..Default::default()
        };
        let content = encode_content(ExportFormat::Xlsx, &settings, &ops(), fixed_now()).unwrap();
        assert!(content.starts_with("ID,Name,Email,Age,City\n"));
    }

    #[test]
    fn test_json_with_metadata_envelope() {
        let content =
            encode_content(ExportFormat::Json, &AppSettings::default(), &ops(), fixed_now())
                .unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["data"].as_array().unwrap().len(), 5);
        assert_eq!(value["metadata"]["exportDate"], "2024-03-05T14:30:00.000Z");
        assert_eq!(value["metadata"]["rowCount"], 5);
        assert_eq!(value["metadata"]["operationsApplied"][1], "missing");
        assert!(value["metadata"].get("format").is_none());
        assert!(content.contains("\n  \"metadata\""));
    }

    #[test]
    fn test_json_without_metadata_is_row_array() {
        let settings = AppSettings {
            include_metadata: false,
            ..Default::default()
        };
        let content = encode_content(ExportFormat::Json, &settings, &ops(), fixed_now()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4]["city"], "Phoenix");
    }

    #[test]
    fn test_uncompressed_artifact() {
        let artifact =
            build_artifact(ExportFormat::Xlsx, &AppSettings::default(), &ops(), fixed_now())
                .unwrap();
        assert_eq!(artifact.file_name, "cleaned_data.xlsx");
        assert_eq!(
            artifact.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn test_export_requires_cleaned_step() {
        let state = AppState::default();
        assert!(matches!(
            exportable_operations(&state),
            Err(ExportError::NotCleaned)
        ));
    }

    #[test]
    fn test_format_lookup() {
        assert_eq!(ExportFormat::from_extension("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_extension("zip"), None);
    }
}
