use thiserror::Error;

use crate::catalog::ViolationRule;
use crate::records::StudentRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcedureError {
    #[error("violation '{0}' has no procedures")]
    EmptyProcedures(String),
}

/// The response that applies to the next occurrence of a violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureStep {
    pub text: String,
    /// Position in the violation's procedure list
    pub index: usize,
    /// 1-based occurrence number of this violation for the student
    pub iteration: usize,
}

/// Count how many times this violation is already on the student's record.
///
/// `history` must hold a single student's records; the counter is per
/// student and per violation id, never per level.
pub fn prior_occurrences<'a, I>(violation: &ViolationRule, history: I) -> usize
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    history
        .into_iter()
        .filter(|r| r.violation_id.as_deref() == Some(violation.id.as_str()))
        .count()
}

/// Pick the escalation step for the next occurrence.
///
/// Once the count passes the end of the ladder the last (most severe)
/// procedure repeats.
pub fn next_procedure<'a, I>(
    violation: &ViolationRule,
    history: I,
) -> Result<ProcedureStep, ProcedureError>
where
    I: IntoIterator<Item = &'a StudentRecord>,
{
    let last = violation
        .procedures
        .len()
        .checked_sub(1)
        .ok_or_else(|| ProcedureError::EmptyProcedures(violation.id.clone()))?;

    let prior = prior_occurrences(violation, history);
    let index = prior.min(last);

    Ok(ProcedureStep {
        text: violation.procedures[index].clone(),
        index,
        iteration: prior + 1,
    })
}
