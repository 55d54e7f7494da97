use std::collections::HashSet;

use uuid::Uuid;

use crate::records::StudentRecord;
use crate::scoring::{calculate_score, ScoreResult};
use crate::store::{RecordStore, StoreError};

/// Handle for a record that is visible but not yet confirmed by the store.
#[must_use = "a pending write must be confirmed or rolled back"]
#[derive(Debug, PartialEq, Eq)]
pub struct PendingWrite {
    record_id: Uuid,
}

impl PendingWrite {
    pub fn record_id(&self) -> Uuid {
        self.record_id
    }
}

/// In-memory record collection with optimistic writes.
///
/// `apply` shows a record immediately; `confirm` keeps it once the store has
/// accepted it; `rollback` removes it again.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: Vec<StudentRecord>,
    pending: HashSet<Uuid>,
}

impl Ledger {
    pub fn new(records: Vec<StudentRecord>) -> Self {
        Self {
            records,
            pending: HashSet::new(),
        }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn records_for(&self, student_id: Uuid) -> impl Iterator<Item = &StudentRecord> {
        self.records
            .iter()
            .filter(move |r| r.student_id == student_id)
    }

    /// Recomputed from the current collection on every call
    pub fn score_for(&self, student_id: Uuid) -> ScoreResult {
        calculate_score(self.records_for(student_id))
    }

    pub fn is_pending(&self, record_id: Uuid) -> bool {
        self.pending.contains(&record_id)
    }

    pub fn apply(&mut self, record: StudentRecord) -> PendingWrite {
        let record_id = record.id;
        self.pending.insert(record_id);
        self.records.push(record);
        tracing::debug!(record = %record_id, "applied record optimistically");
        PendingWrite { record_id }
    }

    pub fn confirm(&mut self, write: PendingWrite) {
        self.pending.remove(&write.record_id);
        tracing::debug!(record = %write.record_id, "record confirmed");
    }

    /// Remove the tentative record. Returns it if it was still present.
    pub fn rollback(&mut self, write: PendingWrite) -> Option<StudentRecord> {
        self.pending.remove(&write.record_id);
        let position = self.records.iter().position(|r| r.id == write.record_id)?;
        tracing::warn!(record = %write.record_id, "rolled back unpersisted record");
        Some(self.records.remove(position))
    }

    /// Apply, persist, then confirm; roll back and return the store error if persisting fails.
    pub fn commit<S: RecordStore + ?Sized>(
        &mut self,
        store: &mut S,
        record: StudentRecord,
    ) -> Result<(), StoreError> {
        let write = self.apply(record.clone());
        match store.insert_record(&record) {
            Ok(()) => {
                self.confirm(write);
                Ok(())
            }
            Err(e) => {
                self.rollback(write);
                Err(e)
            }
        }
    }

    /// Drop every record of the given students, mirroring a cascading delete.
    pub fn remove_students(&mut self, ids: &[Uuid]) {
        let ids: HashSet<Uuid> = ids.iter().copied().collect();
        let pending = &mut self.pending;
        self.records.retain(|r| {
            let keep = !ids.contains(&r.student_id);
            if !keep {
                pending.remove(&r.id);
            }
            keep
        });
    }
}
