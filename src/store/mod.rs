pub mod data;
pub mod json;
pub mod memory;

pub use data::{StoreData, STORE_VERSION};
pub use json::JsonFileStore;
pub use memory::MemoryStore;

use thiserror::Error;
use uuid::Uuid;

use crate::records::{NewStudent, Student, StudentRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("student {0} does not exist")]
    UnknownStudent(Uuid),

    #[error("store rejected the write: {0}")]
    Rejected(String),

    #[error("unsupported store version: {0}")]
    UnsupportedVersion(u32),

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store data is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Durable keyed storage for students and their records.
///
/// Writes either fully succeed or leave the store unchanged.
pub trait RecordStore {
    fn list_students(&self) -> Result<Vec<Student>, StoreError>;

    fn get_student(&self, id: Uuid) -> Result<Option<Student>, StoreError> {
        Ok(self.list_students()?.into_iter().find(|s| s.id == id))
    }

    fn insert_student(&mut self, new: NewStudent) -> Result<Student, StoreError> {
        let mut inserted = self.insert_students(vec![new])?;
        inserted
            .pop()
            .ok_or_else(|| StoreError::Rejected("no student inserted".to_string()))
    }

    /// Insert a batch; either every student is stored or none is.
    fn insert_students(&mut self, new: Vec<NewStudent>) -> Result<Vec<Student>, StoreError>;

    fn all_records(&self) -> Result<Vec<StudentRecord>, StoreError>;

    fn records_for(&self, student_id: Uuid) -> Result<Vec<StudentRecord>, StoreError> {
        Ok(self
            .all_records()?
            .into_iter()
            .filter(|r| r.student_id == student_id)
            .collect())
    }

    /// Persist a record. Fails with `UnknownStudent` if the student is gone.
    fn insert_record(&mut self, record: &StudentRecord) -> Result<(), StoreError>;

    /// Delete students and every record that references them.
    fn delete_students(&mut self, ids: &[Uuid]) -> Result<usize, StoreError>;
}
