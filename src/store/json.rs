use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{RecordStore, StoreData, StoreError, STORE_VERSION};
use crate::records::{NewStudent, Student, StudentRecord};

/// Get the default data file path (~/.config/conduct-board/data.json)
pub fn get_data_path() -> PathBuf {
    crate::config::get_config_dir().join("data.json")
}

/// Store backed by a single JSON document.
///
/// Every write is applied to a copy, saved atomically, and only then made
/// visible, so a failed save leaves both disk and memory unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// If the file doesn't exist, starts empty; it is created on first write.
    /// If the file exists but has an unsupported version, returns an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = load_data(&path)?;
        tracing::debug!(
            students = data.students.len(),
            records = data.records.len(),
            "opened store at {}",
            path.display()
        );
        Ok(Self { path, data })
    }

    fn write<T>(
        &mut self,
        apply: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.data.clone();
        let value = apply(&mut next)?;
        save_data(&self.path, &next)?;
        self.data = next;
        Ok(value)
    }
}

fn load_data(path: &Path) -> Result<StoreData, StoreError> {
    if !path.exists() {
        return Ok(StoreData::new());
    }

    let file = File::open(path)?;
    let data: StoreData = serde_json::from_reader(file)?;

    if data.version != STORE_VERSION {
        return Err(StoreError::UnsupportedVersion(data.version));
    }

    Ok(data)
}

fn save_data(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = AtomicWriteFile::open(path)?;
    serde_json::to_writer_pretty(&mut file, data)?;
    file.commit()?;

    Ok(())
}

impl RecordStore for JsonFileStore {
    fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.data.students.clone())
    }

    fn insert_students(&mut self, new: Vec<NewStudent>) -> Result<Vec<Student>, StoreError> {
        let inserted = self.write(|data| {
            Ok(new
                .into_iter()
                .map(|s| data.add_student(s))
                .collect::<Vec<_>>())
        })?;
        tracing::info!(count = inserted.len(), "inserted students");
        Ok(inserted)
    }

    fn all_records(&self) -> Result<Vec<StudentRecord>, StoreError> {
        Ok(self.data.records.clone())
    }

    fn insert_record(&mut self, record: &StudentRecord) -> Result<(), StoreError> {
        self.write(|data| data.add_record(record))?;
        tracing::info!(record = %record.id, student = %record.student_id, "inserted record");
        Ok(())
    }

    fn delete_students(&mut self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let removed = self.write(|data| Ok(data.remove_students(ids)))?;
        tracing::info!(removed, "deleted students and their records");
        Ok(removed)
    }
}
