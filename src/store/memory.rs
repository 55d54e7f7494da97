use uuid::Uuid;

use super::{RecordStore, StoreData, StoreError};
use crate::records::{NewStudent, Student, StudentRecord};

/// Process-local store. `reject_writes` makes every write fail, for
/// exercising rollback paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: StoreData,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.reject_writes {
            Err(StoreError::Rejected("store is read-only".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RecordStore for MemoryStore {
    fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.data.students.clone())
    }

    fn insert_students(&mut self, new: Vec<NewStudent>) -> Result<Vec<Student>, StoreError> {
        self.check_writable()?;
        Ok(new.into_iter().map(|s| self.data.add_student(s)).collect())
    }

    fn all_records(&self) -> Result<Vec<StudentRecord>, StoreError> {
        Ok(self.data.records.clone())
    }

    fn insert_record(&mut self, record: &StudentRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        self.data.add_record(record)
    }

    fn delete_students(&mut self, ids: &[Uuid]) -> Result<usize, StoreError> {
        self.check_writable()?;
        Ok(self.data.remove_students(ids))
    }
}
