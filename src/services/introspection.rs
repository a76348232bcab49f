// File introspection
//
// Reads an uploaded file and estimates its row/column counts from the sniffed
// extension. The CSV splitter is deliberately naive: no quoting, no embedded
// newlines. Every failure collapses into "stats unknown" for the sidebar; the
// typed error is kept for logging and tests.

use crate::models::{FileSource, FileStats, UploadedFile};
use serde_json::Value;
use thiserror::Error;

/// Dataset kinds recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Csv,
    Json,
    /// `.xlsx` / `.xls`; contents are never parsed.
    Excel,
}

impl FileKind {
    /// Map a lower- or mixed-case extension (without the dot) to a kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "json" => Some(FileKind::Json),
            "xlsx" | "xls" => Some(FileKind::Excel),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Csv => "CSV",
            FileKind::Json => "JSON",
            FileKind::Excel => "Excel",
        }
    }
}

#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File is empty")]
    Empty,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON value is not tabular")]
    NotTabular,
}

/// Compute stats for already-read `content` of the given kind.
pub fn analyze(kind: FileKind, content: &str) -> Result<FileStats, IntrospectionError> {
    if kind == FileKind::Excel {
        return Ok(FileStats::default());
    }

    if content.is_empty() {
        return Err(IntrospectionError::Empty);
    }

    match kind {
        FileKind::Csv => Ok(analyze_csv(content)),
        FileKind::Json => analyze_json(content),
        FileKind::Excel => Ok(FileStats::default()),
    }
}

fn analyze_csv(content: &str) -> FileStats {
    let lines: Vec<&str> = content
        .trim()
        .split('\n')
        .filter(|line| !line.is_empty())
        .collect();

    match lines.first() {
        Some(header) => FileStats {
            rows: lines.len() - 1,
            columns: header.split(',').count(),
        },
        None => FileStats::default(),
    }
}

fn analyze_json(content: &str) -> Result<FileStats, IntrospectionError> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(items) => {
            let columns = match items.first() {
                Some(first) => first_element_columns(first)?,
                None => 0,
            };
            Ok(FileStats {
                rows: items.len(),
                columns,
            })
        }
        Value::Object(map) => Ok(FileStats {
            rows: 1,
            columns: map.len(),
        }),
        _ => Err(IntrospectionError::NotTabular),
    }
}

/// Column estimate for the first element of a JSON array.
fn first_element_columns(first: &Value) -> Result<usize, IntrospectionError> {
    match first {
        Value::Object(map) => Ok(map.len()),
        Value::Array(items) => Ok(items.len()),
        Value::String(s) => Ok(s.chars().count()),
        Value::Number(_) | Value::Bool(_) => Ok(0),
        Value::Null => Err(IntrospectionError::NotTabular),
    }
}

/// Reads uploaded files and produces [`FileStats`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileIntrospector;

impl FileIntrospector {
    pub fn new() -> Self {
        Self
    }

    /// Inspect `file`, mapping every failure to `None`.
    ///
    /// Callers tag the result with `file.upload_id` so a stale answer for a
    /// previously selected file can be discarded.
    pub async fn inspect(&self, file: &UploadedFile) -> Option<FileStats> {
        match self.try_inspect(file).await {
            Ok(stats) => {
                tracing::debug!(
                    "Inspected {}: {} rows, {} columns",
                    file.name,
                    stats.rows,
                    stats.columns
                );
                Some(stats)
            }
            Err(e) => {
                tracing::warn!("Could not read stats for {}: {}", file.name, e);
                None
            }
        }
    }

    /// Inspect `file`, keeping the reason for a failure.
    pub async fn try_inspect(&self, file: &UploadedFile) -> Result<FileStats, IntrospectionError> {
        let ext = file.extension().unwrap_or_default();
        let kind = FileKind::from_extension(&ext)
            .ok_or_else(|| IntrospectionError::UnsupportedExtension(ext.clone()))?;

        if kind == FileKind::Excel {
            return Ok(FileStats::default());
        }

        let content = read_text(file).await?;
        analyze(kind, &content)
    }
}

async fn read_text(file: &UploadedFile) -> Result<String, IntrospectionError> {
    match &file.source {
        FileSource::Memory(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        FileSource::Path(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| IntrospectionError::Read {
                    name: file.name.clone(),
                    source,
                })?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
