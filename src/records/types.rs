use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every student starts from this score before any record is applied.
pub const BASE_SCORE: u32 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(default = "default_base_score")]
    pub base_score: u32,
}

fn default_base_score() -> u32 {
    BASE_SCORE
}

impl Student {
    /// Last four digits of the phone number, used as the parent access code.
    /// Shorter numbers return the whole string.
    pub fn access_code(&self) -> String {
        let chars: Vec<char> = self.phone.chars().collect();
        let start = chars.len().saturating_sub(4);
        chars[start..].iter().collect()
    }
}

/// A student that has passed validation but has not been given an id by the store yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    Negative,
    Positive,
}

impl RecordKind {
    pub fn sign(&self) -> char {
        match self {
            RecordKind::Negative => '-',
            RecordKind::Positive => '+',
        }
    }
}

/// An immutable behavior event attributed to one student.
///
/// `points` is always a magnitude; the direction comes from `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub kind: RecordKind,
    pub date: DateTime<Utc>,
    pub details: String,
    pub points: u32,
    pub observer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_applied: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_id: Option<String>,
}

impl StudentRecord {
    /// Points with the sign implied by the record kind.
    pub fn signed_points(&self) -> i64 {
        match self.kind {
            RecordKind::Negative => -(self.points as i64),
            RecordKind::Positive => self.points as i64,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.kind == RecordKind::Positive
    }
}
