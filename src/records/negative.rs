use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::RecordError;
use super::types::{RecordKind, StudentRecord};
use crate::catalog::ViolationRule;
use crate::scoring::{next_procedure, ProcedureStep};

/// Form state for recording a violation against one student.
///
/// Nothing can be previewed or confirmed until a violation is selected.
#[derive(Debug, Clone)]
pub struct ViolationEntry<'a> {
    selected: Option<&'a ViolationRule>,
    observer: String,
}

impl<'a> ViolationEntry<'a> {
    pub fn new(default_observer: impl Into<String>) -> Self {
        Self {
            selected: None,
            observer: default_observer.into(),
        }
    }

    pub fn select(&mut self, rule: &'a ViolationRule) {
        self.selected = Some(rule);
    }

    /// Switching level or tab drops the current choice
    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn set_observer(&mut self, observer: impl Into<String>) {
        self.observer = observer.into();
    }

    pub fn selected(&self) -> Option<&'a ViolationRule> {
        self.selected
    }

    /// Procedure and occurrence number that confirming would apply.
    pub fn preview<'h, I>(&self, history: I) -> Result<ProcedureStep, RecordError>
    where
        I: IntoIterator<Item = &'h StudentRecord>,
    {
        let rule = self.selected.ok_or(RecordError::NoViolationSelected)?;
        Ok(next_procedure(rule, history)?)
    }

    /// Build the NEGATIVE record for this occurrence.
    ///
    /// `history` is the student's current record list; the new record joins it
    /// for every later lookup once the caller stores it.
    pub fn confirm<'h, I>(
        &self,
        student_id: Uuid,
        history: I,
        now: DateTime<Utc>,
    ) -> Result<(StudentRecord, ProcedureStep), RecordError>
    where
        I: IntoIterator<Item = &'h StudentRecord>,
    {
        let rule = self.selected.ok_or(RecordError::NoViolationSelected)?;
        let observer = self.observer.trim();
        if observer.is_empty() {
            return Err(RecordError::EmptyObserver);
        }
        let step = next_procedure(rule, history)?;

        let record = StudentRecord {
            id: Uuid::new_v4(),
            student_id,
            kind: RecordKind::Negative,
            date: now,
            details: rule.description.clone(),
            points: rule.deduction,
            observer: observer.to_string(),
            procedure_applied: Some(step.text.clone()),
            violation_id: Some(rule.id.clone()),
        };
        Ok((record, step))
    }
}
