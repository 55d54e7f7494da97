pub mod error;
pub mod import;
pub mod negative;
pub mod positive;
pub mod search;
pub mod types;

pub use error::RecordError;
pub use import::{import_file, normalize_row, parse_rows, ImportError, ImportOutcome};
pub use negative::ViolationEntry;
pub use positive::{PositiveBoundPolicy, PositiveDraft};
pub use search::{dashboard_counts, resolve_student, search_students, DashboardCounts, LookupError};
pub use types::{NewStudent, RecordKind, Student, StudentRecord, BASE_SCORE};

/// Check a manually entered student: both fields filled and the phone made of digits only.
pub fn validate_new_student(name: &str, phone: &str) -> Result<NewStudent, RecordError> {
    let name = name.trim();
    let phone = phone.trim();
    if name.is_empty() || phone.is_empty() {
        return Err(RecordError::MissingStudentField);
    }
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(RecordError::InvalidPhone);
    }
    Ok(NewStudent {
        name: name.to_string(),
        phone: phone.to_string(),
    })
}
