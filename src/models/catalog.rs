use serde::Serialize;

/// A user-selectable cleaning operation. Selecting one is a UI choice only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningOperation {
    pub id: &'static str,
    pub label: &'static str,
}

pub const CLEANING_OPERATIONS: [CleaningOperation; 8] = [
    CleaningOperation {
        id: "duplicates",
        label: "Remove duplicates",
    },
    CleaningOperation {
        id: "missing",
        label: "Handle missing values",
    },
    CleaningOperation {
        id: "formats",
        label: "Standardize formats",
    },
    CleaningOperation {
        id: "normalize",
        label: "Normalize data",
    },
    CleaningOperation {
        id: "outliers",
        label: "Remove outliers",
    },
    CleaningOperation {
        id: "inconsistencies",
        label: "Fix inconsistencies",
    },
    CleaningOperation {
        id: "types",
        label: "Convert data types",
    },
    CleaningOperation {
        id: "encode",
        label: "Encode categorical data",
    },
];

pub fn find_operation(id: &str) -> Option<&'static CleaningOperation> {
    CLEANING_OPERATIONS.iter().find(|op| op.id == id)
}

/// One row of the fixed sample dataset shown in the preview and exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleRow {
    pub id: u32,
    pub name: &'static str,
    pub email: &'static str,
    pub age: u32,
    pub city: &'static str,
}

pub const SAMPLE_HEADER: [&str; 5] = ["ID", "Name", "Email", "Age", "City"];

pub const SAMPLE_DATA: [SampleRow; 5] = [
    SampleRow {
        id: 1,
        name: "Alice Johnson",
        email: "alice@example.com",
        age: 28,
        city: "New York",
    },
    SampleRow {
        id: 2,
        name: "Bob Smith",
        email: "bob@example.com",
        age: 34,
        city: "Los Angeles",
    },
    SampleRow {
        id: 3,
        name: "Carol White",
        email: "carol@example.com",
        age: 29,
        city: "Chicago",
    },
    SampleRow {
        id: 4,
        name: "David Brown",
        email: "david@example.com",
        age: 42,
        city: "Houston",
    },
    SampleRow {
        id: 5,
        name: "Emma Davis",
        email: "emma@example.com",
        age: 31,
        city: "Phoenix",
    },
];

impl SampleRow {
    /// Field values in header order.
    pub fn fields(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.name.to_string(),
            self.email.to_string(),
            self.age.to_string(),
            self.city.to_string(),
        ]
    }
}

/// The rows the preview table shows for a given row limit.
pub fn preview_rows(limit: usize) -> &'static [SampleRow] {
    &SAMPLE_DATA[..limit.min(SAMPLE_DATA.len())]
}

/// Caption above the preview table.
pub fn preview_caption(limit: usize) -> String {
    format!(
        "Showing first {} of {} rows",
        preview_rows(limit).len(),
        SAMPLE_DATA.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_operation() {
        assert_eq!(find_operation("duplicates").map(|op| op.label), Some("Remove duplicates"));
        assert!(find_operation("shuffle").is_none());
    }

    #[test]
    fn test_preview_is_capped_by_sample_size() {
        assert_eq!(preview_rows(100).len(), 5);
        assert_eq!(preview_rows(3).len(), 3);
        assert_eq!(preview_caption(50), "Showing first 5 of 5 rows");
    }

    #[test]
    fn test_sample_row_fields() {
        assert_eq!(
            SAMPLE_DATA[0].fields(),
            ["1", "Alice Johnson", "alice@example.com", "28", "New York"].map(String::from)
        );
    }
}
