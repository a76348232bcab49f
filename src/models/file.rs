use camino::Utf8PathBuf;
use std::sync::Arc;

/// Where the bytes of an uploaded file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A file on disk, read lazily.
    Path(Utf8PathBuf),
    /// Content already held in memory.
    Memory(Arc<[u8]>),
}

/// Handle to the dataset the user selected.
///
/// Owned by [`crate::models::AppState`]; everything else works with a clone of the
/// handle, never with a copy of the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub source: FileSource,
    /// Upload generation assigned by the state manager. Zero until uploaded.
    pub upload_id: u64,
}

impl UploadedFile {
    pub fn from_path(path: Utf8PathBuf, size: u64) -> Self {
        let name = path.file_name().unwrap_or(path.as_str()).to_string();
        Self {
            name,
            size,
            source: FileSource::Path(path),
            upload_id: 0,
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
            upload_id: 0,
        }
    }

    /// Lower-cased text after the last dot of the file name.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// Row/column estimate for an uploaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStats {
    pub rows: usize,
    pub columns: usize,
}

/// Format a byte count the way the sidebar shows it (`0 B`, `1.5 KB`, ...).
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Format a count with thousands separators (`12,345`).
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
