use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StoreError;
use crate::records::{NewStudent, Student, StudentRecord, BASE_SCORE};

pub const STORE_VERSION: u32 = 1;

/// The full dataset shared by every store implementation.
///
/// Enforces the referential rules: a record may only point at an existing
/// student, and removing a student removes its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    pub version: u32,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub records: Vec<StudentRecord>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreData {
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            students: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn has_student(&self, id: Uuid) -> bool {
        self.students.iter().any(|s| s.id == id)
    }

    /// Assign an id and the base score to a new student
    pub fn add_student(&mut self, new: NewStudent) -> Student {
        let student = Student {
            id: Uuid::new_v4(),
            name: new.name,
            phone: new.phone,
            base_score: BASE_SCORE,
        };
        self.students.push(student.clone());
        student
    }

    pub fn add_record(&mut self, record: &StudentRecord) -> Result<(), StoreError> {
        if !self.has_student(record.student_id) {
            return Err(StoreError::UnknownStudent(record.student_id));
        }
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::Rejected(format!(
                "record {} already exists",
                record.id
            )));
        }
        self.records.push(record.clone());
        Ok(())
    }

    /// Remove students and cascade to their records. Returns how many students were removed.
    pub fn remove_students(&mut self, ids: &[Uuid]) -> usize {
        let ids: HashSet<Uuid> = ids.iter().copied().collect();
        let before = self.students.len();
        self.students.retain(|s| !ids.contains(&s.id));
        self.records.retain(|r| !ids.contains(&r.student_id));
        before - self.students.len()
    }
}
