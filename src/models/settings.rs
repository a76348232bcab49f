use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of sample rows shown in the data preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PreviewRowLimit {
    Fifty,
    Hundred,
    FiveHundred,
    Thousand,
}

impl PreviewRowLimit {
    pub const ALL: [PreviewRowLimit; 4] = [
        PreviewRowLimit::Fifty,
        PreviewRowLimit::Hundred,
        PreviewRowLimit::FiveHundred,
        PreviewRowLimit::Thousand,
    ];

    pub fn rows(self) -> usize {
        u32::from(self) as usize
    }
}

impl From<PreviewRowLimit> for u32 {
    fn from(limit: PreviewRowLimit) -> Self {
        match limit {
            PreviewRowLimit::Fifty => 50,
            PreviewRowLimit::Hundred => 100,
            PreviewRowLimit::FiveHundred => 500,
            PreviewRowLimit::Thousand => 1000,
        }
    }
}

impl TryFrom<u32> for PreviewRowLimit {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            50 => Ok(PreviewRowLimit::Fifty),
            100 => Ok(PreviewRowLimit::Hundred),
            500 => Ok(PreviewRowLimit::FiveHundred),
            1000 => Ok(PreviewRowLimit::Thousand),
            other => Err(format!("unsupported preview row limit: {}", other)),
        }
    }
}

/// Field separator used for CSV exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvDelimiter {
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl CsvDelimiter {
    pub const ALL: [CsvDelimiter; 4] = [
        CsvDelimiter::Comma,
        CsvDelimiter::Semicolon,
        CsvDelimiter::Tab,
        CsvDelimiter::Pipe,
    ];

    /// The literal separator written between fields.
    pub fn as_char(self) -> char {
        match self {
            CsvDelimiter::Comma => ',',
            CsvDelimiter::Semicolon => ';',
            CsvDelimiter::Tab => '\t',
            CsvDelimiter::Pipe => '|',
        }
    }

    /// Persisted identifier (`"comma"`, `"semicolon"`, ...).
    pub fn id(self) -> &'static str {
        match self {
            CsvDelimiter::Comma => "comma",
            CsvDelimiter::Semicolon => "semicolon",
            CsvDelimiter::Tab => "tab",
            CsvDelimiter::Pipe => "pipe",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id)
    }

    /// Label shown in the settings dialog.
    pub fn label(self) -> &'static str {
        match self {
            CsvDelimiter::Comma => "Comma (,)",
            CsvDelimiter::Semicolon => "Semicolon (;)",
            CsvDelimiter::Tab => "Tab",
            CsvDelimiter::Pipe => "Pipe (|)",
        }
    }
}

impl fmt::Display for CsvDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Rows handed to the processing pipeline per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BatchSize {
    FiveHundred,
    Thousand,
    FiveThousand,
    TenThousand,
}

impl BatchSize {
    pub const ALL: [BatchSize; 4] = [
        BatchSize::FiveHundred,
        BatchSize::Thousand,
        BatchSize::FiveThousand,
        BatchSize::TenThousand,
    ];

    pub fn rows(self) -> usize {
        u32::from(self) as usize
    }
}

impl From<BatchSize> for u32 {
    fn from(size: BatchSize) -> Self {
        match size {
            BatchSize::FiveHundred => 500,
            BatchSize::Thousand => 1000,
            BatchSize::FiveThousand => 5000,
            BatchSize::TenThousand => 10000,
        }
    }
}

impl TryFrom<u32> for BatchSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            500 => Ok(BatchSize::FiveHundred),
            1000 => Ok(BatchSize::Thousand),
            5000 => Ok(BatchSize::FiveThousand),
            10000 => Ok(BatchSize::TenThousand),
            other => Err(format!("unsupported batch size: {}", other)),
        }
    }
}

/// User preferences persisted under the `datasetCleanerSettings` key.
///
/// Always a complete record. Keys missing from the persisted JSON take their
/// value from [`AppSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    // Data processing
    pub preview_row_limit: PreviewRowLimit,
    pub csv_delimiter: CsvDelimiter,

    // Export
    pub include_metadata: bool,
    pub compress_exports: bool,

    // Cleaning preferences
    pub confirm_before_cleaning: bool,
    pub show_operation_summary: bool,
    pub auto_detect_data_types: bool,

    // Privacy
    pub clear_data_on_logout: bool,
    pub anonymous_usage_stats: bool,

    // Advanced
    pub processing_batch_size: BatchSize,
    pub enable_experimental_features: bool,
    pub developer_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            preview_row_limit: PreviewRowLimit::Hundred,
            csv_delimiter: CsvDelimiter::Comma,
            include_metadata: true,
            compress_exports: false,
            confirm_before_cleaning: true,
            show_operation_summary: true,
            auto_detect_data_types: true,
            clear_data_on_logout: true,
            anonymous_usage_stats: false,
            processing_batch_size: BatchSize::Thousand,
            enable_experimental_features: false,
            developer_mode: false,
        }
    }
}

/// Partial update for [`AppSettings`]; `None` fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_row_limit: Option<PreviewRowLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_delimiter: Option<CsvDelimiter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compress_exports: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_before_cleaning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_operation_summary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_detect_data_types: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_data_on_logout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous_usage_stats: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_batch_size: Option<BatchSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_experimental_features: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_mode: Option<bool>,
}

impl SettingsPatch {
    /// Returns `base` with every field set in this patch overwritten.
    pub fn merge_into(&self, base: &AppSettings) -> AppSettings {
        AppSettings {
            preview_row_limit: self.preview_row_limit.unwrap_or(base.preview_row_limit),
            csv_delimiter: self.csv_delimiter.unwrap_or(base.csv_delimiter),
            include_metadata: self.include_metadata.unwrap_or(base.include_metadata),
            compress_exports: self.compress_exports.unwrap_or(base.compress_exports),
            confirm_before_cleaning: self
                .confirm_before_cleaning
                .unwrap_or(base.confirm_before_cleaning),
            show_operation_summary: self
                .show_operation_summary
                .unwrap_or(base.show_operation_summary),
            auto_detect_data_types: self
                .auto_detect_data_types
                .unwrap_or(base.auto_detect_data_types),
            clear_data_on_logout: self.clear_data_on_logout.unwrap_or(base.clear_data_on_logout),
            anonymous_usage_stats: self
                .anonymous_usage_stats
                .unwrap_or(base.anonymous_usage_stats),
            processing_batch_size: self
                .processing_batch_size
                .unwrap_or(base.processing_batch_size),
            enable_experimental_features: self
                .enable_experimental_features
                .unwrap_or(base.enable_experimental_features),
            developer_mode: self.developer_mode.unwrap_or(base.developer_mode),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}
