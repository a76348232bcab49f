use super::introspection::FileKind;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Extensions offered in the file picker filter.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["csv", "xlsx", "xls", "json"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("Unsupported file type. Please upload CSV, Excel, or JSON files.")]
    UnsupportedType { name: String },
}

/// Whether a selected or dropped file may become the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadDecision {
    Accepted(FileKind),
    Rejected(UploadRejection),
}

impl UploadDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, UploadDecision::Accepted(_))
    }

    /// User-facing message for a rejection.
    pub fn reason(&self) -> Option<String> {
        match self {
            UploadDecision::Accepted(_) => None,
            UploadDecision::Rejected(rejection) => Some(rejection.to_string()),
        }
    }
}

/// Checks file names against the accepted dataset extensions.
///
/// The picker and drag-and-drop paths both go through the same validator, so
/// they accept and reject exactly the same files.
pub struct UploadValidator {
    /// Matches a trailing `.csv`, `.xlsx`, `.xls` or `.json`, case-insensitive
    extension_pattern: Regex,
}

impl UploadValidator {
    pub fn new() -> Self {
        Self {
            extension_pattern: Regex::new(r"(?i)\.(csv|xlsx|xls|json)$")
                .expect("Invalid upload extension regex"),
        }
    }

    pub fn validate(&self, name: &str) -> UploadDecision {
        let kind = self
            .extension_pattern
            .captures(name)
            .and_then(|caps| caps.get(1))
            .and_then(|ext| FileKind::from_extension(ext.as_str()));

        match kind {
            Some(kind) => UploadDecision::Accepted(kind),
            None => {
                tracing::info!("Rejected upload: {}", name);
                UploadDecision::Rejected(UploadRejection::UnsupportedType {
                    name: name.to_string(),
                })
            }
        }
    }
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new()
    }
}

static VALIDATOR: LazyLock<UploadValidator> = LazyLock::new(UploadValidator::new);

/// Validate `name` with the shared [`UploadValidator`].
pub fn validate_upload(name: &str) -> UploadDecision {
    VALIDATOR.validate(name)
}
