use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::RecordError;
use super::types::{RecordKind, StudentRecord};
use crate::catalog::{PositiveRule, FIXED_POINTS_CAP, VARIABLE_POINTS_CAP};

/// Which upper bound applies to hand-edited positive points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositiveBoundPolicy {
    /// 1..=6 while the last selected rule was variable, otherwise 1..=20
    #[default]
    LastSelected,
    /// Always 1..=20
    Global,
}

/// Form state for a positive record: either a catalog rule or free text.
#[derive(Debug, Clone)]
pub struct PositiveDraft {
    policy: PositiveBoundPolicy,
    selected: Option<PositiveRule>,
    last_selected_variable: bool,
    details: String,
    points: u32,
    observer: String,
}

impl PositiveDraft {
    pub fn new(policy: PositiveBoundPolicy) -> Self {
        Self {
            policy,
            selected: None,
            last_selected_variable: false,
            details: String::new(),
            points: 1,
            observer: String::new(),
        }
    }

    /// Pre-fill description and points from a catalog rule
    pub fn select_rule(&mut self, rule: &PositiveRule) {
        self.details = rule.description.clone();
        self.points = rule.points;
        self.last_selected_variable = rule.is_variable;
        self.selected = Some(rule.clone());
    }

    /// Editing the description away from the selected rule turns the draft into a custom entry.
    pub fn set_details(&mut self, details: impl Into<String>) {
        self.details = details.into();
        if let Some(rule) = &self.selected {
            if rule.description != self.details {
                self.selected = None;
            }
        }
    }

    pub fn set_points(&mut self, points: u32) {
        self.points = points;
    }

    pub fn set_observer(&mut self, observer: impl Into<String>) {
        self.observer = observer.into();
    }

    pub fn selected(&self) -> Option<&PositiveRule> {
        self.selected.as_ref()
    }

    pub fn is_custom(&self) -> bool {
        self.selected.is_none()
    }

    /// Points the record would carry: a selected fixed rule always submits its declared value.
    pub fn points(&self) -> u32 {
        match &self.selected {
            Some(rule) if !rule.is_variable => rule.points,
            _ => self.points,
        }
    }

    pub fn points_bound(&self) -> RangeInclusive<u32> {
        match self.policy {
            PositiveBoundPolicy::LastSelected if self.last_selected_variable => {
                1..=VARIABLE_POINTS_CAP
            }
            _ => 1..=FIXED_POINTS_CAP,
        }
    }

    /// Whether `build` would succeed; mirrors the disabled state of a submit button.
    pub fn can_submit(&self) -> bool {
        self.check().is_ok()
    }

    fn check(&self) -> Result<(), RecordError> {
        if self.details.trim().is_empty() {
            return Err(RecordError::EmptyDetails);
        }
        if self.observer.trim().is_empty() {
            return Err(RecordError::EmptyObserver);
        }
        let points = self.points();
        let bound = self.points_bound();
        if !bound.contains(&points) {
            return Err(RecordError::PointsOutOfRange {
                points,
                min: *bound.start(),
                max: *bound.end(),
            });
        }
        Ok(())
    }

    /// Build the POSITIVE record. No procedure or violation fields are set.
    pub fn build(&self, student_id: Uuid, now: DateTime<Utc>) -> Result<StudentRecord, RecordError> {
        self.check()?;
        Ok(StudentRecord {
            id: Uuid::new_v4(),
            student_id,
            kind: RecordKind::Positive,
            date: now,
            details: self.details.trim().to_string(),
            points: self.points(),
            observer: self.observer.trim().to_string(),
            procedure_applied: None,
            violation_id: None,
        })
    }
}
